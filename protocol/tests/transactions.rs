//! Signed transactions through `Signer`, against a scripted node.

mod common;

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::json;

use common::{challenge, done, keypair, rejected, Call, ScriptedTransport};
use rubix_core::config::{
    QuorumConfig, ENDPOINT_CREATE_FT, ENDPOINT_CREATE_NFT, ENDPOINT_DEPLOY_CONTRACT,
    ENDPOINT_DEPLOY_NFT, ENDPOINT_EXECUTE_CONTRACT, ENDPOINT_EXECUTE_NFT, ENDPOINT_FT_TRANSFER,
    ENDPOINT_GENERATE_CONTRACT, ENDPOINT_RBT_TRANSFER, ENDPOINT_SIGNATURE_RESPONSE,
};
use rubix_core::identity::{Account, Did};
use rubix_core::quorum::QuorumError;
use rubix_core::transaction::{Signer, SignerError};

const SENDER: &str = "bafysender";
const RECEIVER: &str = "bafyreceiver";

fn signer(replies: Vec<serde_json::Value>) -> (Signer, Arc<ScriptedTransport>) {
    let node = Arc::new(ScriptedTransport::new(replies));
    let account = Account::new(Did::parse(SENDER).unwrap(), keypair());
    let signer = Signer::new(account, node.clone(), QuorumConfig::default());
    (signer, node)
}

fn receiver() -> Did {
    Did::parse(RECEIVER).unwrap()
}

#[tokio::test]
async fn rbt_transfer_runs_one_round() {
    let (signer, node) = signer(vec![challenge("tx-1"), done("Transfer finished successfully")]);
    let outcome = signer
        .send_rbt_tokens(&receiver(), 2.5, "rent")
        .await
        .unwrap();
    assert_eq!(outcome.rounds, 1);
    assert_eq!(outcome.message.as_deref(), Some("Transfer finished successfully"));

    let calls = node.calls();
    assert_eq!(node.endpoints(), vec![ENDPOINT_RBT_TRANSFER, ENDPOINT_SIGNATURE_RESPONSE]);
    assert_eq!(
        calls[0].body(),
        &json!({
            "comment": "rent",
            "receiver": RECEIVER,
            "sender": SENDER,
            "tokenCOunt": 2.5,
            "type": 2
        })
    );
    assert_eq!(calls[1].body()["id"], "tx-1");
}

#[tokio::test]
async fn rbt_amount_must_be_positive() {
    let (signer, node) = signer(vec![]);
    for amount in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            signer.send_rbt_tokens(&receiver(), amount, "").await,
            Err(SignerError::InvalidInput { field: "amount", .. })
        ));
    }
    assert!(node.calls().is_empty());
}

#[tokio::test]
async fn create_ft_body() {
    let (signer, node) = signer(vec![challenge("ft-1"), done("FT created")]);
    signer.create_ft("GOLD", 100, 1).await.unwrap();
    assert_eq!(
        node.calls()[0].body(),
        &json!({
            "did": SENDER,
            "ft_count": 100,
            "ft_name": "GOLD",
            "ft_num_start_index": 0,
            "token_count": 1
        })
    );
    assert_eq!(node.endpoints()[0], ENDPOINT_CREATE_FT);
}

#[tokio::test]
async fn create_ft_rejects_empty_name_and_zero_supply() {
    let (signer, node) = signer(vec![]);
    assert!(matches!(
        signer.create_ft("  ", 10, 1).await,
        Err(SignerError::InvalidInput { field: "name", .. })
    ));
    assert!(matches!(
        signer.create_ft("GOLD", 0, 1).await,
        Err(SignerError::InvalidInput { field: "supply", .. })
    ));
    assert!(node.calls().is_empty());
}

#[tokio::test]
async fn ft_transfer_body() {
    let (signer, node) = signer(vec![challenge("ft-2"), done("ok")]);
    let creator = Did::parse("bafycreator").unwrap();
    signer
        .send_ft(&receiver(), "GOLD", 3, &creator, "")
        .await
        .unwrap();
    let body = node.calls()[0].body().clone();
    assert_eq!(node.endpoints()[0], ENDPOINT_FT_TRANSFER);
    assert_eq!(body["creatorDID"], "bafycreator");
    assert_eq!(body["ft_count"], 3);
    assert_eq!(body["quorum_type"], 2);
    assert_eq!(body["sender"], SENDER);
}

#[tokio::test]
async fn transaction_without_challenge_fails() {
    let (signer, _) = signer(vec![done("nothing to sign")]);
    assert!(matches!(
        signer.send_rbt_tokens(&receiver(), 1.0, "").await,
        Err(SignerError::Quorum(QuorumError::UnexpectedShape { .. }))
    ));
}

#[tokio::test]
async fn transaction_rejected_by_node() {
    let (signer, _) = signer(vec![rejected("insufficient balance")]);
    match signer.send_rbt_tokens(&receiver(), 1000.0, "").await {
        Err(SignerError::Quorum(QuorumError::Rejected { message, request_id, .. })) => {
            assert_eq!(message, "insufficient balance");
            assert!(request_id.is_none());
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn contract_deploy_generates_address_first() {
    let (signer, node) = signer(vec![
        json!({ "status": true, "message": "generated", "result": "QmContractAddr" }),
        challenge("sc-1"),
        done("deployed"),
    ]);
    let deployment = signer
        .deploy_smart_contract(
            &PathBuf::from("contract.wasm"),
            &PathBuf::from("lib.rs"),
            &PathBuf::from("schema.json"),
            0.001,
            "first deploy",
        )
        .await
        .unwrap();
    assert_eq!(deployment.address, "QmContractAddr");
    assert_eq!(deployment.outcome.rounds, 1);

    let calls = node.calls();
    match &calls[0] {
        Call::Multipart {
            endpoint,
            files,
            fields,
        } => {
            assert_eq!(endpoint, ENDPOINT_GENERATE_CONTRACT);
            let names: Vec<_> = files.iter().map(|f| f.field.as_str()).collect();
            assert_eq!(names, vec!["binaryCodePath", "rawCodePath", "schemaFilePath"]);
            assert_eq!(fields, &vec![("did".to_string(), SENDER.to_string())]);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(calls[1].endpoint(), ENDPOINT_DEPLOY_CONTRACT);
    assert_eq!(
        calls[1].body(),
        &json!({
            "comment": "first deploy",
            "deployerAddr": SENDER,
            "quorumType": 2,
            "rbtAmount": 0.001,
            "smartContractToken": "QmContractAddr"
        })
    );
}

#[tokio::test]
async fn empty_generated_address_stops_deploy() {
    let (signer, node) = signer(vec![json!({ "status": true, "message": "", "result": "" })]);
    let err = signer
        .deploy_smart_contract(
            &PathBuf::from("a.wasm"),
            &PathBuf::from("a.rs"),
            &PathBuf::from("a.json"),
            1.0,
            "",
        )
        .await
        .unwrap_err();
    assert!(matches!(err, SignerError::AddressGeneration { .. }));
    assert_eq!(node.calls().len(), 1);
}

#[tokio::test]
async fn refused_address_generation() {
    let (signer, _) = signer(vec![rejected("schema invalid")]);
    match signer
        .deploy_nft(
            &PathBuf::from("art.png"),
            &PathBuf::from("meta.json"),
            "",
            1.0,
            "",
            "art.png",
        )
        .await
    {
        Err(SignerError::AddressGeneration { endpoint, message }) => {
            assert_eq!(endpoint, ENDPOINT_CREATE_NFT);
            assert_eq!(message, "schema invalid");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn contract_execution_body() {
    let (signer, node) = signer(vec![challenge("sc-2"), done("executed")]);
    signer
        .execute_smart_contract("QmContractAddr", r#"{"vote":"yes"}"#, "")
        .await
        .unwrap();
    assert_eq!(node.endpoints()[0], ENDPOINT_EXECUTE_CONTRACT);
    let body = node.calls()[0].body().clone();
    assert_eq!(body["executorAddr"], SENDER);
    assert_eq!(body["smartContractData"], r#"{"vote":"yes"}"#);
}

#[tokio::test]
async fn nft_lifecycle() {
    let (signer, node) = signer(vec![
        json!({ "status": true, "result": "QmNftAddr" }),
        challenge("n1"),
        done("nft deployed"),
        challenge("n2"),
        done("nft executed"),
        challenge("n3"),
        done("nft transferred"),
    ]);

    let deployment = signer
        .deploy_nft(
            &PathBuf::from("art.png"),
            &PathBuf::from("meta.json"),
            "data",
            5.0,
            "info",
            "art.png",
        )
        .await
        .unwrap();
    assert_eq!(deployment.address, "QmNftAddr");

    signer.execute_nft("QmNftAddr", "run", "").await.unwrap();
    signer
        .transfer_nft("QmNftAddr", &receiver(), 7.0, "", "gift")
        .await
        .unwrap();

    let calls = node.calls();
    assert_eq!(calls[1].endpoint(), ENDPOINT_DEPLOY_NFT);
    assert_eq!(
        calls[1].body(),
        &json!({
            "did": SENDER,
            "nft": "QmNftAddr",
            "nft_data": "data",
            "nft_file_name": "art.png",
            "nft_metadata": "info",
            "nft_value": 5.0,
            "quorum_type": 2
        })
    );

    let execute = calls[3].body();
    assert_eq!(calls[3].endpoint(), ENDPOINT_EXECUTE_NFT);
    assert_eq!(execute["receiver"], "");
    assert!(execute.get("nft_value").is_none());

    let transfer = calls[5].body();
    assert_eq!(calls[5].endpoint(), ENDPOINT_EXECUTE_NFT);
    assert_eq!(transfer["receiver"], RECEIVER);
    assert_eq!(transfer["nft_value"], 7.0);
    assert_eq!(transfer["comment"], "gift");
}
