//! # Key Vault
//!
//! Encrypted-at-rest storage for account keys.
//!
//! ```text
//! envelope.rs: PEM-style text containers for public and private keys
//! store.rs   : on-disk layout: <root>/<alias>/<did>/{pubKey.pem, privKey.pem}
//! error.rs   : VaultError
//! ```
//!
//! Private keys are sealed with a passphrase (PBKDF2-HMAC-SHA256, 200 000
//! iterations, AES-256-GCM). There is no default passphrase: an empty one is
//! rejected before anything is derived or written.
//!
//! An alias binds to one identity for its whole life. Saving into an alias
//! that already holds an identity fails without touching the existing files,
//! and a save that fails halfway leaves nothing behind.

pub mod envelope;
pub mod error;
pub mod store;

pub use envelope::{decode_private_key, decode_public_key, encode_private_key, encode_public_key};
pub use error::VaultError;
pub use store::KeyStore;
