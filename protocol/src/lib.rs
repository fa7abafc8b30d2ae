// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Rubix Core
//!
//! The cryptographic identity core of a Rubix client. It turns a 24-word
//! phrase into a secp256k1 signing key, keeps that key encrypted on disk,
//! and runs the challenge/response protocol a Rubix node uses to authorize
//! new identities and signed transactions.
//!
//! ## Architecture
//!
//! - **crypto**: mnemonics, seed and key derivation, ECDSA, passphrase sealing.
//! - **vault**: PEM-framed key containers and the alias/DID directory layout.
//! - **transport**: the async seam to a node, with a reqwest implementation.
//! - **quorum**: the bounded signing loop shared by every operation.
//! - **identity**: DIDs, accounts, and registration.
//! - **transaction**: RBT, FT, contract, and NFT operations.
//! - **config**: protocol constants and client settings.
//! - **error**: the crate-wide error and its categories.
//!
//! ## Ground rules
//!
//! 1. Secret material is never logged, serialized, or cloned out of its type.
//! 2. No default passphrase. An empty one is an error.
//! 3. Every signing session is bounded in rounds and in time.

pub mod config;
pub mod crypto;
pub mod error;
pub mod identity;
pub mod quorum;
pub mod transaction;
pub mod transport;
pub mod vault;

pub use error::{Error, ErrorKind, Result};
