//! # Transaction Signer
//!
//! Acts as one account against one node. Every operation opens a
//! type-specific request and then runs the quorum signing loop with the
//! account's key; the terminal node response is returned to the caller.
//!
//! Contract and NFT deployments take one extra hop first: the artifacts are
//! uploaded as a multipart form and the node answers with the address the
//! deployment will live at.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use super::requests::{
    CreateFtRequest, DeployContractRequest, DeployNftRequest, ExecuteContractRequest,
    ExecuteNftRequest, FtTransferRequest, RbtTransferRequest,
};
use crate::config::{
    QuorumConfig, ENDPOINT_CREATE_FT, ENDPOINT_CREATE_NFT, ENDPOINT_DEPLOY_CONTRACT,
    ENDPOINT_DEPLOY_NFT, ENDPOINT_EXECUTE_CONTRACT, ENDPOINT_EXECUTE_NFT, ENDPOINT_FT_TRANSFER,
    ENDPOINT_GENERATE_CONTRACT, ENDPOINT_RBT_TRANSFER, QUORUM_TYPE,
};
use crate::identity::{Account, Did};
use crate::quorum::{NodeResponse, QuorumError, QuorumOutcome, QuorumSession, ResultPayload};
use crate::transport::{FilePart, Transport, TransportError};

#[derive(Debug, Error)]
pub enum SignerError {
    #[error("invalid {field}: {reason}")]
    InvalidInput {
        field: &'static str,
        reason: &'static str,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Quorum(#[from] QuorumError),

    /// The upload hop was refused or produced no address.
    #[error("address generation at {endpoint} failed: {message}")]
    AddressGeneration { endpoint: String, message: String },

    #[error("could not encode request body: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A finished deployment: where it lives and how the node answered.
#[derive(Clone, Debug, PartialEq)]
pub struct Deployment {
    pub address: String,
    pub outcome: QuorumOutcome,
}

/// Signs transactions as one account.
pub struct Signer {
    account: Account,
    transport: Arc<dyn Transport>,
    config: QuorumConfig,
}

impl Signer {
    pub fn new(account: Account, transport: Arc<dyn Transport>, config: QuorumConfig) -> Self {
        Self {
            account,
            transport,
            config,
        }
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn did(&self) -> &Did {
        self.account.did()
    }

    /// Transfer RBT to `receiver`.
    pub async fn send_rbt_tokens(
        &self,
        receiver: &Did,
        amount: f64,
        comment: &str,
    ) -> Result<QuorumOutcome, SignerError> {
        positive("amount", amount)?;
        let body = RbtTransferRequest {
            comment: comment.to_string(),
            receiver: receiver.to_string(),
            sender: self.did().to_string(),
            token_count: amount,
            quorum_type: QUORUM_TYPE,
        };
        info!(sender = %self.did(), receiver = %receiver, amount, "initiating RBT transfer");
        self.submit(ENDPOINT_RBT_TRANSFER, &body).await
    }

    /// Mint `supply` fungible tokens named `name`, locking `rbt_lock_amount` RBT.
    pub async fn create_ft(
        &self,
        name: &str,
        supply: u64,
        rbt_lock_amount: u64,
    ) -> Result<QuorumOutcome, SignerError> {
        not_blank("name", name)?;
        nonzero("supply", supply)?;
        nonzero("rbt_lock_amount", rbt_lock_amount)?;
        let body = CreateFtRequest {
            did: self.did().to_string(),
            ft_count: supply,
            ft_name: name.to_string(),
            ft_num_start_index: 0,
            token_count: rbt_lock_amount,
        };
        info!(did = %self.did(), name, supply, "creating FT");
        self.submit(ENDPOINT_CREATE_FT, &body).await
    }

    /// Transfer `count` units of the FT `name` minted by `creator`.
    pub async fn send_ft(
        &self,
        receiver: &Did,
        name: &str,
        count: u64,
        creator: &Did,
        comment: &str,
    ) -> Result<QuorumOutcome, SignerError> {
        not_blank("name", name)?;
        nonzero("count", count)?;
        let body = FtTransferRequest {
            comment: comment.to_string(),
            creator_did: creator.to_string(),
            ft_count: count,
            ft_name: name.to_string(),
            quorum_type: QUORUM_TYPE,
            receiver: receiver.to_string(),
            sender: self.did().to_string(),
        };
        info!(sender = %self.did(), receiver = %receiver, name, count, "initiating FT transfer");
        self.submit(ENDPOINT_FT_TRANSFER, &body).await
    }

    /// Upload a contract's artifacts, then deploy it with `value` RBT locked.
    pub async fn deploy_smart_contract(
        &self,
        wasm_file: &Path,
        code_file: &Path,
        schema_file: &Path,
        value: f64,
        comment: &str,
    ) -> Result<Deployment, SignerError> {
        positive("value", value)?;
        let files = [
            FilePart::new("binaryCodePath", wasm_file),
            FilePart::new("rawCodePath", code_file),
            FilePart::new("schemaFilePath", schema_file),
        ];
        let address = self.generate_address(ENDPOINT_GENERATE_CONTRACT, &files).await?;
        info!(deployer = %self.did(), contract = %address, "deploying smart contract");

        let body = DeployContractRequest {
            comment: comment.to_string(),
            deployer_addr: self.did().to_string(),
            quorum_type: QUORUM_TYPE,
            rbt_amount: value,
            smart_contract_token: address.clone(),
        };
        let outcome = self.submit(ENDPOINT_DEPLOY_CONTRACT, &body).await?;
        Ok(Deployment { address, outcome })
    }

    pub async fn execute_smart_contract(
        &self,
        contract: &str,
        data: &str,
        comment: &str,
    ) -> Result<QuorumOutcome, SignerError> {
        not_blank("contract", contract)?;
        let body = ExecuteContractRequest {
            comment: comment.to_string(),
            executor_addr: self.did().to_string(),
            quorum_type: QUORUM_TYPE,
            smart_contract_data: data.to_string(),
            smart_contract_token: contract.to_string(),
        };
        info!(executor = %self.did(), contract, "executing smart contract");
        self.submit(ENDPOINT_EXECUTE_CONTRACT, &body).await
    }

    /// Upload an NFT's artifact and metadata, then deploy it.
    pub async fn deploy_nft(
        &self,
        artifact_file: &Path,
        metadata_file: &Path,
        data: &str,
        value: f64,
        metadata_info: &str,
        file_name: &str,
    ) -> Result<Deployment, SignerError> {
        positive("value", value)?;
        let files = [
            FilePart::new("artifact", artifact_file),
            FilePart::new("metadata", metadata_file),
        ];
        let address = self.generate_address(ENDPOINT_CREATE_NFT, &files).await?;
        info!(deployer = %self.did(), nft = %address, "deploying NFT");

        let body = DeployNftRequest {
            did: self.did().to_string(),
            nft: address.clone(),
            nft_data: data.to_string(),
            nft_file_name: file_name.to_string(),
            nft_metadata: metadata_info.to_string(),
            nft_value: value,
            quorum_type: QUORUM_TYPE,
        };
        let outcome = self.submit(ENDPOINT_DEPLOY_NFT, &body).await?;
        Ok(Deployment { address, outcome })
    }

    pub async fn execute_nft(
        &self,
        nft: &str,
        data: &str,
        comment: &str,
    ) -> Result<QuorumOutcome, SignerError> {
        not_blank("nft", nft)?;
        let body = ExecuteNftRequest {
            comment: comment.to_string(),
            executor: self.did().to_string(),
            nft: nft.to_string(),
            nft_data: data.to_string(),
            nft_value: None,
            quorum_type: QUORUM_TYPE,
            receiver: String::new(),
        };
        info!(executor = %self.did(), nft, "executing NFT");
        self.submit(ENDPOINT_EXECUTE_NFT, &body).await
    }

    /// Hand an NFT to `receiver` at `value`.
    pub async fn transfer_nft(
        &self,
        nft: &str,
        receiver: &Did,
        value: f64,
        data: &str,
        comment: &str,
    ) -> Result<QuorumOutcome, SignerError> {
        not_blank("nft", nft)?;
        positive("value", value)?;
        let body = ExecuteNftRequest {
            comment: comment.to_string(),
            executor: self.did().to_string(),
            nft: nft.to_string(),
            nft_data: data.to_string(),
            nft_value: Some(value),
            quorum_type: QUORUM_TYPE,
            receiver: receiver.to_string(),
        };
        info!(executor = %self.did(), receiver = %receiver, nft, "transferring NFT");
        self.submit(ENDPOINT_EXECUTE_NFT, &body).await
    }

    async fn submit<B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<QuorumOutcome, SignerError> {
        let body = serde_json::to_value(body)?;
        let mut session =
            QuorumSession::new(self.transport.as_ref(), self.account.keypair(), self.config);
        Ok(session.open_for_challenge(endpoint, &body).await?)
    }

    async fn generate_address(
        &self,
        endpoint: &str,
        files: &[FilePart],
    ) -> Result<String, SignerError> {
        let did = self.did().to_string();
        let raw: Value = self
            .transport
            .post_multipart(endpoint, files, &[("did", did.as_str())])
            .await?;
        let response = NodeResponse::from_value(endpoint, raw)?;
        let failure = |message: String| SignerError::AddressGeneration {
            endpoint: endpoint.to_string(),
            message,
        };
        if !response.status {
            return Err(failure(response.message.unwrap_or_default()));
        }
        match response.result {
            Some(ResultPayload::Text(address)) if !address.trim().is_empty() => Ok(address),
            _ => Err(failure(
                response
                    .message
                    .unwrap_or_else(|| "node returned no address".to_string()),
            )),
        }
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), SignerError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SignerError::InvalidInput {
            field,
            reason: "must be a positive number",
        })
    }
}

fn nonzero(field: &'static str, value: u64) -> Result<(), SignerError> {
    if value > 0 {
        Ok(())
    } else {
        Err(SignerError::InvalidInput {
            field,
            reason: "must be greater than zero",
        })
    }
}

fn not_blank(field: &'static str, value: &str) -> Result<(), SignerError> {
    if value.trim().is_empty() {
        Err(SignerError::InvalidInput {
            field,
            reason: "must not be empty",
        })
    } else {
        Ok(())
    }
}
