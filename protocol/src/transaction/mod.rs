//! # Transactions
//!
//! Token, contract, and NFT operations signed by a registered account.
//!
//! ```text
//! requests.rs: Request bodies, field names exactly as the node expects them
//! signer.rs  : Signer: one account, one node, every operation type
//! ```
//!
//! Each operation POSTs its request and then runs a
//! [`QuorumSession`](crate::quorum::QuorumSession) to completion. Amounts
//! are validated locally before anything is sent.

pub mod requests;
pub mod signer;

pub use requests::{
    CreateFtRequest, DeployContractRequest, DeployNftRequest, ExecuteContractRequest,
    ExecuteNftRequest, FtTransferRequest, RbtTransferRequest,
};
pub use signer::{Deployment, Signer, SignerError};
