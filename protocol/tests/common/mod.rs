//! Shared helpers for the integration tests: a node that answers from a
//! script and records every call it receives.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use rubix_core::crypto::keys::RubixKeypair;
use rubix_core::transport::{FilePart, Transport, TransportError};

/// Golden mnemonic shared with other Rubix clients.
pub const MNEMONIC: &str = "buffalo tumble defy laundry call almost little pig lift party property pool frame erosion mind library sample floor ring enemy word enemy foster ill";

/// sha256("rubix challenge"), base64.
pub const CHALLENGE_HASH: &str = "XAbsZA6/auAHdQA8GSw/tox80gIQXSo4rBZRg4xGiFY=";

pub const SECRET_HEX: &str = "e32a09e939376358c37c8780beb632f5cf2fa12c8a53bc77984e60964fd59c78";

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Post { endpoint: String, body: Value },
    Get { endpoint: String, query: Vec<(String, String)> },
    Multipart { endpoint: String, files: Vec<FilePart>, fields: Vec<(String, String)> },
}

impl Call {
    pub fn endpoint(&self) -> &str {
        match self {
            Call::Post { endpoint, .. }
            | Call::Get { endpoint, .. }
            | Call::Multipart { endpoint, .. } => endpoint,
        }
    }

    pub fn body(&self) -> &Value {
        match self {
            Call::Post { body, .. } => body,
            other => panic!("not a JSON post: {other:?}"),
        }
    }
}

/// Replies are consumed in order regardless of the verb.
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Result<Value, TransportError>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedTransport {
    pub fn new(replies: Vec<Value>) -> Self {
        Self::with_results(replies.into_iter().map(Ok).collect())
    }

    pub fn with_results(replies: Vec<Result<Value, TransportError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn endpoints(&self) -> Vec<String> {
        self.calls().iter().map(|c| c.endpoint().to_string()).collect()
    }

    pub fn remaining(&self) -> usize {
        self.replies.lock().unwrap().len()
    }

    fn reply(&self, call: Call) -> Result<Value, TransportError> {
        let endpoint = call.endpoint().to_string();
        self.calls.lock().unwrap().push(call);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(TransportError::Request {
                    endpoint,
                    message: "script exhausted".into(),
                })
            })
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn post(&self, endpoint: &str, body: &Value) -> Result<Value, TransportError> {
        self.reply(Call::Post {
            endpoint: endpoint.to_string(),
            body: body.clone(),
        })
    }

    async fn get(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Value, TransportError> {
        self.reply(Call::Get {
            endpoint: endpoint.to_string(),
            query: owned(query),
        })
    }

    async fn post_multipart(
        &self,
        endpoint: &str,
        files: &[FilePart],
        fields: &[(&str, &str)],
    ) -> Result<Value, TransportError> {
        self.reply(Call::Multipart {
            endpoint: endpoint.to_string(),
            files: files.to_vec(),
            fields: owned(fields),
        })
    }
}

fn owned(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

pub fn keypair() -> RubixKeypair {
    RubixKeypair::from_hex(SECRET_HEX).unwrap()
}

pub fn challenge(id: &str) -> Value {
    json!({
        "status": true,
        "message": "Signature needed",
        "result": { "id": id, "hash": CHALLENGE_HASH }
    })
}

pub fn done(message: &str) -> Value {
    json!({ "status": true, "message": message, "result": null })
}

pub fn rejected(message: &str) -> Value {
    json!({ "status": false, "message": message, "result": null })
}
