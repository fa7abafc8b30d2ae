//! Error types for the key vault.

use std::path::PathBuf;
use thiserror::Error;

use crate::identity::did::DidError;

/// Everything that can go wrong encoding, decoding, saving, or loading keys.
///
/// No variant carries key material or the passphrase.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Containers are never written without a passphrase.
    #[error("a passphrase is required to encrypt or decrypt a private key")]
    EmptyPassphrase,

    /// The BEGIN/END markers are missing or out of order.
    #[error("malformed key container: {0}")]
    MalformedContainer(&'static str),

    #[error("key container body is not valid base64")]
    InvalidBase64,

    /// Fewer bytes than salt, nonce and tag need.
    #[error("truncated key container: {0} bytes")]
    TruncatedContainer(usize),

    /// Wrong passphrase or tampered ciphertext; the two are indistinguishable.
    #[error("authentication failed: wrong passphrase or corrupted container")]
    AuthenticationFailure,

    /// Decrypted plaintext or public key body has the wrong length.
    #[error("invalid key length in container: {0} bytes")]
    InvalidKeyLength(usize),

    #[error("public key container does not hold a valid secp256k1 point")]
    InvalidPublicKey,

    #[error("encryption failed")]
    SealFailed,

    /// The stored public key does not belong to the decrypted private key.
    #[error("stored public key does not match the private key")]
    KeyMismatch,

    #[error("invalid alias '{0}': must be a single non-hidden path component")]
    InvalidAlias(String),

    #[error(transparent)]
    InvalidDid(#[from] DidError),

    /// The alias already holds an identity. Nothing was written.
    #[error("alias '{alias}' is already bound to an identity")]
    AliasAlreadyBound { alias: String },

    /// More than one identity, or a directory that is not a valid DID,
    /// under one alias. Never resolved automatically.
    #[error("alias '{alias}' is corrupted: found {identities} identity directories")]
    CorruptedAlias { alias: String, identities: usize },

    #[error("alias '{0}' not found")]
    AliasNotFound(String),

    #[error("vault I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl VaultError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
