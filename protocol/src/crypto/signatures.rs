//! # Digital Signatures
//!
//! ECDSA over secp256k1, the way the Rubix node checks it.
//!
//! ## Message handling
//!
//! The node hands the client a challenge that is already a digest, and
//! verifies the response against that value directly. So the message is the
//! ECDSA input:
//!
//! - messages of up to 32 bytes are read as a big-endian integer (left-padded
//!   with zeros to 32 bytes);
//! - longer messages are truncated to their leftmost 32 bytes, the standard
//!   ECDSA bits-to-integer conversion. Nothing is hashed.
//!
//! ## Encoding
//!
//! Signatures are produced deterministically (RFC 6979), low-S, and
//! DER-encoded. Verification also accepts 64-byte compact signatures and
//! high-S signatures from other implementations, which are normalized before
//! checking.

use k256::ecdsa::signature::hazmat::{PrehashSigner, PrehashVerifier};
use k256::ecdsa::{Signature, VerifyingKey};
use thiserror::Error;

use super::keys::{RubixKeypair, RubixSignature};
use crate::config::{
    COMPRESSED_PUBLIC_KEY_LENGTH, SIGNING_DIGEST_LENGTH, UNCOMPRESSED_PUBLIC_KEY_LENGTH,
};

/// Errors during signing and verification.
///
/// A signature that simply doesn't check out is not an error; `verify`
/// returns `Ok(false)` for that.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("signing failed")]
    SigningFailure,

    #[error("invalid public key length: expected 33 or 65 bytes, got {0}")]
    InvalidPublicKeyLength(usize),

    #[error("invalid public key: not a point on secp256k1")]
    InvalidPublicKey,
}

/// The 32-byte ECDSA input for `message`.
pub fn signing_digest(message: &[u8]) -> [u8; SIGNING_DIGEST_LENGTH] {
    let mut digest = [0u8; SIGNING_DIGEST_LENGTH];
    if message.len() <= SIGNING_DIGEST_LENGTH {
        digest[SIGNING_DIGEST_LENGTH - message.len()..].copy_from_slice(message);
    } else {
        digest.copy_from_slice(&message[..SIGNING_DIGEST_LENGTH]);
    }
    digest
}

/// Sign `message` and return the DER encoding.
///
/// Pure and deterministic: the same key and message always give the same
/// bytes.
pub fn sign(keypair: &RubixKeypair, message: &[u8]) -> Result<RubixSignature, SignatureError> {
    let digest = signing_digest(message);
    let signature: Signature = keypair
        .signing_key()
        .sign_prehash(&digest)
        .map_err(|_| SignatureError::SigningFailure)?;
    Ok(RubixSignature::from_der(
        signature.to_der().as_bytes().to_vec(),
    ))
}

/// Check `signature_bytes` over `message` against a SEC1 public key.
///
/// # Errors
///
/// Only the public key can make this fail: a length other than 33 or 65, or
/// bytes that are not a curve point. A malformed or non-matching signature
/// is `Ok(false)`.
pub fn verify(
    public_key_bytes: &[u8],
    message: &[u8],
    signature_bytes: &[u8],
) -> Result<bool, SignatureError> {
    if public_key_bytes.len() != COMPRESSED_PUBLIC_KEY_LENGTH
        && public_key_bytes.len() != UNCOMPRESSED_PUBLIC_KEY_LENGTH
    {
        return Err(SignatureError::InvalidPublicKeyLength(
            public_key_bytes.len(),
        ));
    }
    let verifying_key = VerifyingKey::from_sec1_bytes(public_key_bytes)
        .map_err(|_| SignatureError::InvalidPublicKey)?;

    let Some(signature) = parse_signature(signature_bytes) else {
        return Ok(false);
    };
    let signature = signature.normalize_s().unwrap_or(signature);

    let digest = signing_digest(message);
    Ok(verifying_key.verify_prehash(&digest, &signature).is_ok())
}

fn parse_signature(bytes: &[u8]) -> Option<Signature> {
    Signature::from_der(bytes)
        .ok()
        .or_else(|| Signature::from_slice(bytes).ok())
}
