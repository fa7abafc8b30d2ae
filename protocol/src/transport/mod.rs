//! # Node Transport
//!
//! The seam between the identity core and a Rubix node. Everything above
//! this module speaks JSON values to endpoint paths; how they reach the node
//! is the transport's business.
//!
//! [`HttpTransport`] is the production implementation over `reqwest`. Tests
//! script node behaviour with their own [`Transport`] implementations.

pub mod http;

use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use thiserror::Error;

pub use http::HttpTransport;

/// Failures below the protocol layer. Never retried by callers.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request to {endpoint} failed: {message}")]
    Request { endpoint: String, message: String },

    #[error("request to {endpoint} timed out")]
    Timeout { endpoint: String },

    #[error("{endpoint} returned HTTP {status}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("could not decode response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    #[error("could not read upload {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid transport configuration: {0}")]
    InvalidConfig(String),
}

/// A file attached to a multipart request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilePart {
    /// Form field name the node expects.
    pub field: String,
    pub path: PathBuf,
}

impl FilePart {
    pub fn new(field: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            field: field.into(),
            path: path.into(),
        }
    }
}

/// Request/response exchange with a node.
///
/// Calls are awaited one at a time by the protocol layer; implementations
/// don't need to handle overlapping requests from one session.
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST a JSON body and return the decoded JSON response.
    async fn post(&self, endpoint: &str, body: &Value) -> Result<Value, TransportError>;

    /// GET with query parameters.
    async fn get(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Value, TransportError>;

    /// POST a multipart form of files and text fields.
    async fn post_multipart(
        &self,
        endpoint: &str,
        files: &[FilePart],
        fields: &[(&str, &str)],
    ) -> Result<Value, TransportError>;
}
