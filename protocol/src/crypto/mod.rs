//! # Cryptographic Primitives for Rubix
//!
//! Everything key-shaped flows through here:
//!
//! - **mnemonic**: 24-word BIP-39 phrases and 64-byte seeds.
//! - **derivation**: BIP-32 master key and child 0.
//! - **keys**: the opaque secp256k1 keypair and its public types.
//! - **signatures**: deterministic ECDSA, DER on the wire.
//! - **encryption**: PBKDF2 + AES-256-GCM sealing for the key vault.
//!
//! All of it is a thin, typed layer over audited RustCrypto implementations.

pub(crate) mod derivation;
pub mod encryption;
pub mod keys;
pub mod mnemonic;
pub mod signatures;

pub use keys::{KeyError, RubixKeypair, RubixPublicKey, RubixSignature};
pub use mnemonic::{derive_seed, generate_mnemonic, validate_mnemonic, Mnemonic, Seed};
pub use signatures::{sign, verify, SignatureError};
