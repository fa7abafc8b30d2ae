//! # Mnemonic Phrases & Seeds
//!
//! BIP-39 handling for Rubix identities. A Rubix account is always backed by
//! a 24-word English phrase (256 bits of entropy plus an 8-bit checksum), and
//! the phrase is stretched into a 64-byte seed with
//! `PBKDF2-HMAC-SHA512(phrase, "mnemonic" || passphrase, 2048)`.
//!
//! The seed feeds [`crate::crypto::derivation`], which turns it into the one
//! signing key the account uses.
//!
//! Phrases and seeds are secret. Both types here zeroize their buffers on
//! drop and print as `[redacted]` under `Debug`.

use bip39::Language;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use std::fmt;
use thiserror::Error;
use zeroize::{Zeroize, Zeroizing};

use crate::config::{MNEMONIC_ENTROPY_LENGTH, MNEMONIC_WORD_COUNT, SEED_LENGTH};

/// Errors from phrase validation and seed derivation.
///
/// None of these carry the phrase itself.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MnemonicError {
    #[error("mnemonic is empty")]
    EmptyInput,

    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(&'static str),

    #[error("mnemonic generation failed")]
    GenerationFailed,
}

/// A validated 24-word BIP-39 phrase.
///
/// Only constructed through [`generate_mnemonic`] or [`Mnemonic::parse`], so
/// holding one means the checksum has been checked.
pub struct Mnemonic {
    phrase: Zeroizing<String>,
}

impl Mnemonic {
    /// Parse and validate a phrase exactly as given: lowercase words from
    /// the English list separated by single ASCII spaces. Nothing is
    /// normalized, so the seed is always derived from the text the user
    /// supplied.
    pub fn parse(phrase: &str) -> Result<Self, MnemonicError> {
        if phrase.trim().is_empty() {
            return Err(MnemonicError::EmptyInput);
        }
        if phrase.split(' ').any(str::is_empty)
            || phrase.chars().any(|c| c.is_whitespace() && c != ' ')
        {
            return Err(MnemonicError::InvalidMnemonic(
                "words must be separated by single spaces",
            ));
        }
        if phrase.split(' ').count() != MNEMONIC_WORD_COUNT {
            return Err(MnemonicError::InvalidMnemonic("expected 24 words"));
        }
        bip39::Mnemonic::parse_in_normalized(Language::English, phrase).map_err(
            |e| match e {
                bip39::Error::UnknownWord(_) => {
                    MnemonicError::InvalidMnemonic("word not in the English list")
                }
                bip39::Error::InvalidChecksum => MnemonicError::InvalidMnemonic("checksum mismatch"),
                _ => MnemonicError::InvalidMnemonic("malformed phrase"),
            },
        )?;
        Ok(Self {
            phrase: Zeroizing::new(phrase.to_string()),
        })
    }

    /// The space-separated phrase. Show it to the user once, then drop it.
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    pub fn word_count(&self) -> usize {
        self.phrase.split(' ').count()
    }

    /// Stretch the phrase into a 64-byte seed.
    pub fn to_seed(&self, passphrase: &str) -> Result<Seed, MnemonicError> {
        derive_seed(&self.phrase, passphrase)
    }
}

impl fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mnemonic({} words, [redacted])", self.word_count())
    }
}

/// A 64-byte BIP-39 seed.
pub struct Seed {
    bytes: Zeroizing<[u8; SEED_LENGTH]>,
}

impl Seed {
    /// Wrap raw seed bytes, e.g. from a backup that stored the seed directly.
    pub fn from_bytes(mut bytes: [u8; SEED_LENGTH]) -> Self {
        let seed = Self {
            bytes: Zeroizing::new(bytes),
        };
        bytes.zeroize();
        seed
    }

    pub fn as_bytes(&self) -> &[u8; SEED_LENGTH] {
        &self.bytes
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed([redacted])")
    }
}

/// Generate a fresh 24-word phrase from the OS CSPRNG.
pub fn generate_mnemonic() -> Result<Mnemonic, MnemonicError> {
    generate_mnemonic_with_rng(&mut OsRng)
}

pub(crate) fn generate_mnemonic_with_rng<R: RngCore + CryptoRng>(
    rng: &mut R,
) -> Result<Mnemonic, MnemonicError> {
    let mut entropy = Zeroizing::new([0u8; MNEMONIC_ENTROPY_LENGTH]);
    rng.fill_bytes(entropy.as_mut());
    let mnemonic = bip39::Mnemonic::from_entropy_in(Language::English, entropy.as_ref())
        .map_err(|_| MnemonicError::GenerationFailed)?;
    Ok(Mnemonic {
        phrase: Zeroizing::new(mnemonic.to_string()),
    })
}

/// True when `phrase` is a well-formed 24-word English phrase with a valid
/// checksum.
pub fn validate_mnemonic(phrase: &str) -> bool {
    Mnemonic::parse(phrase).is_ok()
}

/// Validate `phrase` and derive its 64-byte seed.
///
/// An empty passphrase is allowed here; it is the BIP-39 default.
pub fn derive_seed(phrase: &str, passphrase: &str) -> Result<Seed, MnemonicError> {
    let checked = Mnemonic::parse(phrase)?;
    let parsed = bip39::Mnemonic::parse_in_normalized(Language::English, checked.phrase())
        .map_err(|_| MnemonicError::InvalidMnemonic("malformed phrase"))?;
    Ok(Seed {
        bytes: Zeroizing::new(parsed.to_seed(passphrase)),
    })
}
