//! # Key Management
//!
//! secp256k1 keypairs for Rubix identities.
//!
//! Every Rubix account is backed by exactly one secp256k1 key: child 0 of
//! the BIP-32 master node derived from the account's mnemonic. This module
//! holds that key and the public types that travel with it.
//!
//! ## Security considerations
//!
//! - [`RubixKeypair`] is opaque. It has no `Clone`, no
//!   `Serialize`, and no public accessor for the scalar. The only way key
//!   bytes leave the type is through the vault codec, inside this crate.
//! - The scalar is zeroized when the keypair is dropped (k256's `SigningKey`
//!   implements `ZeroizeOnDrop`).
//! - Key bytes are never logged.

use k256::ecdsa::SigningKey;
use k256::{FieldBytes, SecretKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;
use zeroize::Zeroizing;

use super::derivation::derive_account_key;
use super::mnemonic::{derive_seed, MnemonicError, Seed};
use super::signatures::{self, SignatureError};
use crate::config::{
    COMPRESSED_PUBLIC_KEY_LENGTH, PRIVATE_KEY_LENGTH, UNCOMPRESSED_PUBLIC_KEY_LENGTH,
};

/// Errors from key construction and parsing.
///
/// Messages never describe key material.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("key derivation failed: scalar out of range")]
    DerivationFailure,

    #[error("invalid public key: not a point on secp256k1")]
    InvalidPublicKey,

    #[error("invalid hex encoding")]
    InvalidHex,

    #[error(transparent)]
    Mnemonic(#[from] MnemonicError),
}

/// A Rubix identity keypair.
///
/// The public key is computed once from the scalar at construction and can
/// never be set independently.
///
/// ```
/// use rubix_core::crypto::keys::RubixKeypair;
///
/// let kp = RubixKeypair::from_hex(
///     "e32a09e939376358c37c8780beb632f5cf2fa12c8a53bc77984e60964fd59c78",
/// ).unwrap();
/// assert_eq!(kp.public_key().as_bytes().len(), 33);
/// let sig = kp.sign(b"challenge digest").unwrap();
/// assert!(kp.public_key().verify(b"challenge digest", &sig));
/// ```
pub struct RubixKeypair {
    signing_key: SigningKey,
    public_key: RubixPublicKey,
}

/// The compressed SEC1 encoding of a Rubix public key (33 bytes).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RubixPublicKey {
    bytes: [u8; COMPRESSED_PUBLIC_KEY_LENGTH],
}

/// A DER-encoded ECDSA signature, as the node expects it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RubixSignature {
    bytes: Vec<u8>,
}

impl RubixKeypair {
    /// Derive the account key from a BIP-39 seed (child 0 of the master node).
    pub fn from_seed(seed: &Seed) -> Result<Self, KeyError> {
        let secret = derive_account_key(seed)?;
        Ok(Self::from_secret_key(secret))
    }

    /// Validate a mnemonic, stretch it, and derive the account key.
    pub fn from_mnemonic(phrase: &str, passphrase: &str) -> Result<Self, KeyError> {
        let seed = derive_seed(phrase, passphrase)?;
        Self::from_seed(&seed)
    }

    /// Import a raw 32-byte secp256k1 scalar.
    pub fn from_private_key(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != PRIVATE_KEY_LENGTH {
            return Err(KeyError::InvalidKeyLength {
                expected: PRIVATE_KEY_LENGTH,
                actual: bytes.len(),
            });
        }
        let secret = SecretKey::from_bytes(FieldBytes::from_slice(bytes))
            .map_err(|_| KeyError::DerivationFailure)?;
        Ok(Self::from_secret_key(secret))
    }

    /// Import a hex-encoded scalar.
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = Zeroizing::new(hex::decode(hex_str.trim()).map_err(|_| KeyError::InvalidHex)?);
        Self::from_private_key(&bytes)
    }

    fn from_secret_key(secret: SecretKey) -> Self {
        let signing_key = SigningKey::from(secret);
        let point = signing_key.verifying_key().to_encoded_point(true);
        let mut bytes = [0u8; COMPRESSED_PUBLIC_KEY_LENGTH];
        bytes.copy_from_slice(point.as_bytes());
        Self {
            signing_key,
            public_key: RubixPublicKey { bytes },
        }
    }

    pub fn public_key(&self) -> &RubixPublicKey {
        &self.public_key
    }

    /// Sign `message` with deterministic ECDSA. See [`signatures::sign`].
    pub fn sign(&self, message: &[u8]) -> Result<RubixSignature, SignatureError> {
        signatures::sign(self, message)
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    /// The raw scalar, for the vault codec only.
    pub(crate) fn secret_bytes(&self) -> Zeroizing<[u8; PRIVATE_KEY_LENGTH]> {
        let mut out = Zeroizing::new([0u8; PRIVATE_KEY_LENGTH]);
        out.copy_from_slice(&self.signing_key.to_bytes());
        out
    }
}

impl fmt::Debug for RubixKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RubixKeypair(pub={})", self.public_key.to_hex())
    }
}

impl PartialEq for RubixKeypair {
    /// Compared by public key; the scalar is never compared directly.
    fn eq(&self, other: &Self) -> bool {
        self.public_key == other.public_key
    }
}

impl Eq for RubixKeypair {}

// ---------------------------------------------------------------------------
// RubixPublicKey
// ---------------------------------------------------------------------------

impl RubixPublicKey {
    /// Parse a SEC1 public key. Both compressed (33) and uncompressed (65)
    /// encodings are accepted; the stored form is always compressed.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, KeyError> {
        if slice.len() != COMPRESSED_PUBLIC_KEY_LENGTH
            && slice.len() != UNCOMPRESSED_PUBLIC_KEY_LENGTH
        {
            return Err(KeyError::InvalidKeyLength {
                expected: COMPRESSED_PUBLIC_KEY_LENGTH,
                actual: slice.len(),
            });
        }
        let vk = k256::ecdsa::VerifyingKey::from_sec1_bytes(slice)
            .map_err(|_| KeyError::InvalidPublicKey)?;
        let point = vk.to_encoded_point(true);
        let mut bytes = [0u8; COMPRESSED_PUBLIC_KEY_LENGTH];
        bytes.copy_from_slice(point.as_bytes());
        Ok(Self { bytes })
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str.trim()).map_err(|_| KeyError::InvalidHex)?;
        Self::try_from_slice(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; COMPRESSED_PUBLIC_KEY_LENGTH] {
        &self.bytes
    }

    /// Lowercase hex, the form the node uses to request a DID.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Verify a signature made by this key. Anything malformed is `false`.
    pub fn verify(&self, message: &[u8], signature: &RubixSignature) -> bool {
        signatures::verify(&self.bytes, message, signature.as_bytes()).unwrap_or(false)
    }
}

impl fmt::Debug for RubixPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RubixPublicKey({})", self.to_hex())
    }
}

impl fmt::Display for RubixPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// serde's array impls stop at 32 elements, so public keys travel as hex.
impl Serialize for RubixPublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for RubixPublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// RubixSignature
// ---------------------------------------------------------------------------

impl RubixSignature {
    pub(crate) fn from_der(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Wrap signature bytes received from elsewhere. No validation happens
    /// until verification.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str.trim()).map_err(|_| KeyError::InvalidHex)?;
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The signature as an ordered byte list, the shape the node's
    /// `signature-response` endpoint takes.
    pub fn to_byte_list(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }
}

impl fmt::Debug for RubixSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RubixSignature({})", self.to_hex())
    }
}
