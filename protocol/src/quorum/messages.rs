//! Wire messages of the signing protocol.
//!
//! Every node response has the same envelope:
//!
//! ```json
//! { "status": true, "message": "...", "result": ... }
//! ```
//!
//! where `result` is a challenge object `{ "id", "hash" }` while the node
//! still wants a signature, and anything else (a string, `null`, another
//! object) once the operation is finished. An object carrying `id` or `hash`
//! that is not a well-formed challenge is rejected, never read as finished.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::error::QuorumError;
use crate::config::SIGNATURE_MODE;
use crate::crypto::keys::RubixSignature;

/// The common node response envelope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeResponse {
    pub status: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub result: Option<ResultPayload>,
}

/// What a response's `result` carries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultPayload {
    /// The node wants another signature.
    Challenge(ChallengePayload),
    /// A terminal string, e.g. a contract token or NFT address.
    Text(String),
    /// Any other terminal value.
    Value(Value),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengePayload {
    pub id: String,
    pub hash: String,
}

/// A decoded challenge round. Lives only for the round it belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Challenge {
    pub request_id: String,
    pub message_hash: Vec<u8>,
}

impl NodeResponse {
    pub fn from_value(endpoint: &str, value: Value) -> Result<Self, QuorumError> {
        let unexpected = |message: String| QuorumError::UnexpectedShape {
            endpoint: endpoint.to_string(),
            message,
        };
        let response: Self = serde_json::from_value(value).map_err(|e| unexpected(e.to_string()))?;
        if let Some(ResultPayload::Value(Value::Object(fields))) = &response.result {
            if fields.contains_key("id") || fields.contains_key("hash") {
                let reason = serde_json::from_value::<ChallengePayload>(Value::Object(fields.clone()))
                    .err()
                    .map_or_else(|| "malformed challenge".to_string(), |e| e.to_string());
                return Err(unexpected(format!("malformed challenge: {reason}")));
            }
        }
        Ok(response)
    }

    /// The challenge this response carries, if any.
    pub fn challenge(&self) -> Result<Option<Challenge>, QuorumError> {
        let Some(ResultPayload::Challenge(payload)) = &self.result else {
            return Ok(None);
        };
        let invalid = |reason| QuorumError::InvalidChallenge {
            request_id: payload.id.clone(),
            reason,
        };
        if payload.hash.trim().is_empty() {
            return Err(invalid("empty hash"));
        }
        let message_hash = STANDARD
            .decode(payload.hash.trim())
            .map_err(|_| invalid("hash is not base64"))?;
        if message_hash.is_empty() {
            return Err(invalid("empty hash"));
        }
        Ok(Some(Challenge {
            request_id: payload.id.clone(),
            message_hash,
        }))
    }
}

/// Body for `/api/signature-response`.
pub fn signature_submission(request_id: &str, signature: &RubixSignature) -> Value {
    json!({
        "id": request_id,
        "Signature": { "Signature": signature.to_byte_list() },
        "mode": SIGNATURE_MODE,
    })
}
