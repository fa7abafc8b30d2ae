//! # Quorum Signing Protocol
//!
//! Every state-changing request to a Rubix node (DID registration, token
//! transfers, contract and NFT operations) is authorized the same way: the
//! node answers with a hash to sign, the client signs it locally and sends
//! the signature back, and this repeats until the node's quorum reaches a
//! result.
//!
//! - [`messages`] models the wire envelopes.
//! - [`session`] runs the bounded challenge/response loop.

pub mod error;
pub mod messages;
pub mod session;

pub use error::{ExceededCause, QuorumError};
pub use messages::{Challenge, NodeResponse, ResultPayload};
pub use session::{QuorumOutcome, QuorumSession, RoundState};
