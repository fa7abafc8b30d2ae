//! Request bodies for the node's transaction endpoints.
//!
//! Field names follow the node byte for byte, including its irregular
//! casing (`tokenCOunt`, `creatorDID`, `quorumType` next to `quorum_type`).

use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RbtTransferRequest {
    pub comment: String,
    pub receiver: String,
    pub sender: String,
    #[serde(rename = "tokenCOunt")]
    pub token_count: f64,
    #[serde(rename = "type")]
    pub quorum_type: u8,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CreateFtRequest {
    pub did: String,
    pub ft_count: u64,
    pub ft_name: String,
    pub ft_num_start_index: u64,
    pub token_count: u64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FtTransferRequest {
    pub comment: String,
    #[serde(rename = "creatorDID")]
    pub creator_did: String,
    pub ft_count: u64,
    pub ft_name: String,
    pub quorum_type: u8,
    pub receiver: String,
    pub sender: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployContractRequest {
    pub comment: String,
    pub deployer_addr: String,
    pub quorum_type: u8,
    pub rbt_amount: f64,
    pub smart_contract_token: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteContractRequest {
    pub comment: String,
    pub executor_addr: String,
    pub quorum_type: u8,
    pub smart_contract_data: String,
    pub smart_contract_token: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DeployNftRequest {
    pub did: String,
    pub nft: String,
    pub nft_data: String,
    pub nft_file_name: String,
    pub nft_metadata: String,
    pub nft_value: f64,
    pub quorum_type: u8,
}

/// Executes an NFT. With `nft_value` set and a receiver, it is a transfer.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExecuteNftRequest {
    pub comment: String,
    pub executor: String,
    pub nft: String,
    pub nft_data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nft_value: Option<f64>,
    pub quorum_type: u8,
    pub receiver: String,
}
