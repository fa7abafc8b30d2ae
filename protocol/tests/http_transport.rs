//! `HttpTransport` against a mock node.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rubix_core::config::{ClientConfig, ENDPOINT_REQUEST_DID, ENDPOINT_VERIFY_SIGNATURE};
use rubix_core::transport::{FilePart, HttpTransport, Transport, TransportError};

fn transport_for(server: &MockServer) -> HttpTransport {
    HttpTransport::new(&ClientConfig {
        node_url: server.uri(),
        ..ClientConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn posts_json_and_decodes_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT_REQUEST_DID))
        .and(body_json(json!({ "public_key": "02ab" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "status": true, "did": "bafyx" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let reply = transport_for(&server)
        .post(ENDPOINT_REQUEST_DID, &json!({ "public_key": "02ab" }))
        .await
        .unwrap();
    assert_eq!(reply["did"], "bafyx");
}

#[tokio::test]
async fn api_key_header_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("X-API-Key", "s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": true })))
        .expect(1)
        .mount(&server)
        .await;

    let t = HttpTransport::new(&ClientConfig {
        node_url: server.uri(),
        api_key: Some("s3cret".into()),
        ..ClientConfig::default()
    })
    .unwrap();
    t.post("/api/anything", &json!({})).await.unwrap();
}

#[tokio::test]
async fn get_sends_query_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(ENDPOINT_VERIFY_SIGNATURE))
        .and(query_param("signer_did", "bafyme"))
        .and(query_param("signed_msg", "hello world"))
        .and(query_param("signature", "3044"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": true })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = transport_for(&server)
        .get(
            ENDPOINT_VERIFY_SIGNATURE,
            &[
                ("signer_did", "bafyme"),
                ("signed_msg", "hello world"),
                ("signature", "3044"),
            ],
        )
        .await
        .unwrap();
    assert_eq!(reply["status"], true);
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = transport_for(&server)
        .post("/api/register-did", &json!({}))
        .await
        .unwrap_err();
    match err {
        TransportError::Status {
            endpoint,
            status,
            body,
        } => {
            assert_eq!(endpoint, "/api/register-did");
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn non_json_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    assert!(matches!(
        transport_for(&server).post("/api/x", &json!({})).await,
        Err(TransportError::Decode { .. })
    ));
}

#[tokio::test]
async fn slow_node_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": true }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let t = HttpTransport::new(&ClientConfig {
        node_url: server.uri(),
        request_timeout: Duration::from_millis(200),
        ..ClientConfig::default()
    })
    .unwrap();
    assert!(matches!(
        t.post("/api/x", &json!({})).await,
        Err(TransportError::Timeout { .. })
    ));
}

#[tokio::test]
async fn unreachable_node_is_a_request_error() {
    let t = HttpTransport::new(&ClientConfig {
        // Port 9 (discard) is not listening in test environments.
        node_url: "http://127.0.0.1:9".into(),
        request_timeout: Duration::from_secs(5),
        ..ClientConfig::default()
    })
    .unwrap();
    assert!(matches!(
        t.post("/api/x", &json!({})).await,
        Err(TransportError::Request { .. }) | Err(TransportError::Timeout { .. })
    ));
}

#[tokio::test]
async fn multipart_uploads_files_and_fields() {
    let dir = tempfile::tempdir().unwrap();
    let wasm = dir.path().join("contract.wasm");
    std::fs::write(&wasm, b"\0asm-bytes").unwrap();

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate-smart-contract"))
        .and(body_string_contains("name=\"did\""))
        .and(body_string_contains("bafydeployer"))
        .and(body_string_contains("name=\"binaryCodePath\"; filename=\"contract.wasm\""))
        .and(body_string_contains("asm-bytes"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": true, "result": "QmContract" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let reply = transport_for(&server)
        .post_multipart(
            "/api/generate-smart-contract",
            &[FilePart::new("binaryCodePath", &wasm)],
            &[("did", "bafydeployer")],
        )
        .await
        .unwrap();
    assert_eq!(reply["result"], "QmContract");
}

#[tokio::test]
async fn missing_upload_file_fails_before_sending() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let err = transport_for(&server)
        .post_multipart(
            "/api/create-nft",
            &[FilePart::new("artifact", "/definitely/not/here.png")],
            &[],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::File { .. }));
}
