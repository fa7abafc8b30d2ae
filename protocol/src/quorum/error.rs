//! Error types for the quorum signing protocol.

use thiserror::Error;

use crate::crypto::signatures::SignatureError;
use crate::transport::TransportError;

/// Which bound a session ran into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExceededCause {
    /// More signature submissions than `max_rounds`.
    RoundLimit,
    /// The session deadline passed, possibly mid-request.
    Deadline,
}

/// Failures of a challenge/response signing session.
#[derive(Debug, Error)]
pub enum QuorumError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The node answered with `status: false`.
    #[error("node rejected request at {endpoint}: {message}")]
    Rejected {
        endpoint: String,
        request_id: Option<String>,
        message: String,
    },

    /// A challenge whose hash is empty or not base64.
    #[error("invalid challenge for request {request_id}: {reason}")]
    InvalidChallenge {
        request_id: String,
        reason: &'static str,
    },

    /// The response is not the shape this step requires.
    #[error("unexpected response from {endpoint}: {message}")]
    UnexpectedShape { endpoint: String, message: String },

    #[error("signing session exceeded its bound ({cause:?}) after {rounds} rounds")]
    Exceeded { cause: ExceededCause, rounds: u32 },

    #[error(transparent)]
    Signing(#[from] SignatureError),

    /// Sessions run once; a finished session cannot be reopened.
    #[error("signing session already used")]
    SessionFinished,
}
