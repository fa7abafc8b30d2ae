//! # Decentralized Identifiers
//!
//! A Rubix DID is an opaque string minted by the node for one public key.
//! The client never parses its structure. It only has to be safe to use as
//! a directory name in the key vault, so that is all we check.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Longest DID we accept. Keeps vault paths within filesystem name limits.
pub const MAX_DID_LENGTH: usize = 255;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DidError {
    #[error("DID is empty")]
    Empty,

    #[error("DID is too long: {0} bytes")]
    TooLong(usize),

    #[error("DID contains characters that are not allowed in a path component")]
    InvalidCharacters,
}

/// An identity bound to exactly one keypair.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Did(String);

impl Did {
    pub fn parse(s: &str) -> Result<Self, DidError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DidError::Empty);
        }
        if s.len() > MAX_DID_LENGTH {
            return Err(DidError::TooLong(s.len()));
        }
        if s.starts_with('.')
            || !s
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            return Err(DidError::InvalidCharacters);
        }
        Ok(Self(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Did {
    type Error = DidError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Did> for String {
    fn from(did: Did) -> Self {
        did.0
    }
}
