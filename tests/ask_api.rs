//! Integration tests for the BLIP HTTP client against a mock server.

use blip_chat::api::{AskError, BlipClient, FORMAT_ERROR};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn server_with_body(body: serde_json::Value) -> MockServer {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ask-blip"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"question": "wen moon?"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&mock_server)
        .await;
    mock_server
}

#[tokio::test]
async fn accepts_success_string_response() {
    let server = server_with_body(json!({"success": true, "response": "hello"})).await;
    let client = BlipClient::new(&server.uri());
    assert_eq!(client.ask("wen moon?").await.unwrap(), "hello");
}

#[tokio::test]
async fn accepts_text_field_response() {
    let server = server_with_body(json!({"response": {"text": "hello"}})).await;
    let client = BlipClient::new(&server.uri());
    assert_eq!(client.ask("wen moon?").await.unwrap(), "hello");
}

#[tokio::test]
async fn accepts_nested_response_field() {
    let server = server_with_body(json!({"response": {"response": "hello"}})).await;
    let client = BlipClient::new(&server.uri());
    assert_eq!(client.ask("wen moon?").await.unwrap(), "hello");
}

#[tokio::test]
async fn accepts_message_field() {
    let server = server_with_body(json!({"message": "hello"})).await;
    let client = BlipClient::new(&server.uri());
    assert_eq!(client.ask("wen moon?").await.unwrap(), "hello");
}

#[tokio::test]
async fn unrecognized_shape_degrades_to_fallback_text() {
    let server = server_with_body(json!({"success": true, "response": {}})).await;
    let client = BlipClient::new(&server.uri());
    assert_eq!(client.ask("wen moon?").await.unwrap(), FORMAT_ERROR);
}

#[tokio::test]
async fn non_success_status_is_an_error_regardless_of_body() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ask-blip"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"response": "looks valid"})),
        )
        .mount(&mock_server)
        .await;

    let client = BlipClient::new(&mock_server.uri());
    match client.ask("wen moon?").await {
        Err(AskError::Status(status)) => assert_eq!(status.as_u16(), 500),
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn unparseable_body_is_a_network_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/ask-blip"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let client = BlipClient::new(&mock_server.uri());
    assert!(matches!(
        client.ask("wen moon?").await,
        Err(AskError::Network(_))
    ));
}

#[tokio::test]
async fn trailing_slash_in_base_url_is_tolerated() {
    let server = server_with_body(json!({"response": "hello"})).await;
    let client = BlipClient::new(&format!("{}/", server.uri()));
    assert_eq!(client.ask("wen moon?").await.unwrap(), "hello");
}
