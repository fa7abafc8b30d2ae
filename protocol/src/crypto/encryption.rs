//! # Passphrase Encryption
//!
//! AES-256-GCM under a key stretched from a passphrase with
//! PBKDF2-HMAC-SHA256. This is the sealing layer of the key vault; the PEM
//! framing lives in [`crate::vault::envelope`].
//!
//! ## Wire format
//!
//! [`seal`] returns `salt(16) || nonce(12) || ciphertext || tag(16)` as one
//! buffer and [`open`] expects exactly that. Salt and nonce are fresh from
//! the OS CSPRNG on every call, so sealing the same plaintext twice gives
//! different bytes.
//!
//! ## Errors
//!
//! A wrong passphrase and a tampered container both fail GCM tag
//! verification and are reported as the same [`EncryptionError::DecryptFailed`].

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use sha2::Sha256;
use thiserror::Error;
use zeroize::Zeroizing;

use crate::config::{
    AES_KEY_LENGTH, AES_NONCE_LENGTH, KDF_ITERATIONS, KDF_SALT_LENGTH, MIN_CONTAINER_LENGTH,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncryptionError {
    #[error("encryption failed")]
    EncryptFailed,

    #[error("decryption failed -- wrong passphrase or corrupted ciphertext")]
    DecryptFailed,

    #[error("ciphertext too short: {0} bytes")]
    CiphertextTooShort(usize),
}

/// Stretch `passphrase` into an AES-256 key.
pub fn derive_key(passphrase: &str, salt: &[u8]) -> Zeroizing<[u8; AES_KEY_LENGTH]> {
    let mut key = Zeroizing::new([0u8; AES_KEY_LENGTH]);
    pbkdf2_hmac::<Sha256>(passphrase.as_bytes(), salt, KDF_ITERATIONS, key.as_mut());
    key
}

/// Encrypt `plaintext` under `passphrase`. Returns `salt || nonce || ct+tag`.
pub fn seal(passphrase: &str, plaintext: &[u8]) -> Result<Vec<u8>, EncryptionError> {
    seal_with_rng(&mut OsRng, passphrase, plaintext)
}

pub(crate) fn seal_with_rng<R: RngCore + CryptoRng>(
    rng: &mut R,
    passphrase: &str,
    plaintext: &[u8],
) -> Result<Vec<u8>, EncryptionError> {
    let mut salt = [0u8; KDF_SALT_LENGTH];
    let mut nonce_bytes = [0u8; AES_NONCE_LENGTH];
    rng.fill_bytes(&mut salt);
    rng.fill_bytes(&mut nonce_bytes);

    let key = derive_key(passphrase, &salt);
    let cipher =
        Aes256Gcm::new_from_slice(key.as_ref()).map_err(|_| EncryptionError::EncryptFailed)?;
    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
        .map_err(|_| EncryptionError::EncryptFailed)?;

    let mut out = Vec::with_capacity(KDF_SALT_LENGTH + AES_NONCE_LENGTH + ciphertext.len());
    out.extend_from_slice(&salt);
    out.extend_from_slice(&nonce_bytes);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Decrypt a buffer produced by [`seal`].
pub fn open(passphrase: &str, data: &[u8]) -> Result<Zeroizing<Vec<u8>>, EncryptionError> {
    if data.len() < MIN_CONTAINER_LENGTH {
        return Err(EncryptionError::CiphertextTooShort(data.len()));
    }
    let (salt, rest) = data.split_at(KDF_SALT_LENGTH);
    let (nonce_bytes, ciphertext) = rest.split_at(AES_NONCE_LENGTH);

    let key = derive_key(passphrase, salt);
    let cipher =
        Aes256Gcm::new_from_slice(key.as_ref()).map_err(|_| EncryptionError::DecryptFailed)?;
    cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map(Zeroizing::new)
        .map_err(|_| EncryptionError::DecryptFailed)
}
