//! # Identity Registration
//!
//! Binding a new keypair to a DID takes two hops and then the quorum loop:
//!
//! 1. `POST /api/request-did-for-pubkey` with the compressed public key in
//!    hex. The node mints a DID for it.
//! 2. `POST /api/register-did` with that DID. The node always answers with
//!    a challenge here.
//! 3. Challenge/sign/submit until the node reports the DID registered.

use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::info;

use super::account::Account;
use super::did::{Did, DidError};
use crate::config::{
    QuorumConfig, ENDPOINT_REGISTER_DID, ENDPOINT_REQUEST_DID, ENDPOINT_VERIFY_SIGNATURE,
};
use crate::crypto::keys::{RubixKeypair, RubixSignature};
use crate::quorum::{QuorumError, QuorumSession};
use crate::transport::{Transport, TransportError};

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("node refused to mint a DID: {0}")]
    DidRequestRejected(String),

    #[error("node response from {endpoint} did not include a DID")]
    MissingDid { endpoint: String },

    #[error("node returned an unusable DID: {0}")]
    InvalidDid(#[from] DidError),

    #[error(transparent)]
    Quorum(#[from] QuorumError),
}

#[derive(Deserialize)]
struct DidRequestResponse {
    status: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    did: Option<String>,
}

/// Reply of `/api/verify-signature`. A reply without `status` is a negative
/// answer.
#[derive(Deserialize)]
struct VerifyResponse {
    #[serde(default)]
    status: bool,
}

/// Mint and register a DID for `keypair`.
pub async fn register_did(
    transport: &dyn Transport,
    keypair: &RubixKeypair,
    config: QuorumConfig,
) -> Result<Did, RegistrationError> {
    let public_key = keypair.public_key().to_hex();
    info!(public_key = %public_key, "requesting DID");

    let raw = transport
        .post(ENDPOINT_REQUEST_DID, &json!({ "public_key": public_key }))
        .await?;
    let response: DidRequestResponse =
        serde_json::from_value(raw).map_err(|e| QuorumError::UnexpectedShape {
            endpoint: ENDPOINT_REQUEST_DID.to_string(),
            message: e.to_string(),
        })?;
    if !response.status {
        return Err(RegistrationError::DidRequestRejected(
            response.message.unwrap_or_default(),
        ));
    }
    let did = response
        .did
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| RegistrationError::MissingDid {
            endpoint: ENDPOINT_REQUEST_DID.to_string(),
        })?;
    let did = Did::parse(&did)?;

    let mut session = QuorumSession::new(transport, keypair, config);
    let outcome = session
        .open_for_challenge(ENDPOINT_REGISTER_DID, &json!({ "did": did.as_str() }))
        .await?;

    info!(did = %did, rounds = outcome.rounds, "DID registered");
    Ok(did)
}

/// Register `keypair` and bundle it with its new DID.
pub async fn register_account(
    transport: &dyn Transport,
    keypair: RubixKeypair,
    config: QuorumConfig,
) -> Result<Account, RegistrationError> {
    let did = register_did(transport, &keypair, config).await?;
    Ok(Account::new(did, keypair))
}

/// Ask the node to check a signature made by `did`. The node resolves the
/// DID's public key itself.
pub async fn verify_signature_online(
    transport: &dyn Transport,
    did: &Did,
    message: &str,
    signature: &RubixSignature,
) -> Result<bool, RegistrationError> {
    let signature_hex = signature.to_hex();
    let query = [
        ("signer_did", did.as_str()),
        ("signed_msg", message),
        ("signature", signature_hex.as_str()),
    ];
    let raw: Value = transport.get(ENDPOINT_VERIFY_SIGNATURE, &query).await?;
    let response: VerifyResponse =
        serde_json::from_value(raw).map_err(|e| QuorumError::UnexpectedShape {
            endpoint: ENDPOINT_VERIFY_SIGNATURE.to_string(),
            message: e.to_string(),
        })?;
    Ok(response.status)
}
