//! Tests for the Brevo channel against a local mock API

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vc_shared::config::{BrevoConfig, SenderIdentity};

use crate::email::{BrevoEmailChannel, EmailChannel, EmailMessage};
use crate::InfrastructureError;

fn config(server: &MockServer) -> BrevoConfig {
    BrevoConfig {
        api_key: "xkeysib-test".to_string(),
        api_url: format!("{}/v3/smtp/email", server.uri()),
        timeout_seconds: 10,
    }
}

fn message() -> EmailMessage {
    EmailMessage {
        to: "pet@owner.example".to_string(),
        subject: "VetClinic verification code".to_string(),
        html_body: "<p>482913</p>".to_string(),
        text_body: "482913".to_string(),
    }
}

#[tokio::test]
async fn test_accepted_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/smtp/email"))
        .and(header("api-key", "xkeysib-test"))
        .and(body_partial_json(json!({
            "sender": { "email": "no-reply@vetclinic.local", "name": "VetClinic" },
            "to": [{ "email": "pet@owner.example" }],
            "subject": "VetClinic verification code",
            "htmlContent": "<p>482913</p>",
            "textContent": "482913"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "messageId": "<1@brevo>" })))
        .expect(1)
        .mount(&server)
        .await;

    let channel = BrevoEmailChannel::new(config(&server), SenderIdentity::default()).unwrap();
    let result = channel.send(&message()).await;

    assert!(result.is_ok());
    assert_eq!(channel.channel_name(), "brevo");
}

#[tokio::test]
async fn test_server_error_is_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/smtp/email"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .expect(1)
        .mount(&server)
        .await;

    let channel = BrevoEmailChannel::new(config(&server), SenderIdentity::default()).unwrap();
    let result = channel.send(&message()).await;

    match result {
        Err(InfrastructureError::Email(msg)) => assert!(msg.contains("500")),
        other => panic!("Expected Email error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unauthorized_is_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let channel = BrevoEmailChannel::new(config(&server), SenderIdentity::default()).unwrap();
    assert!(channel.send(&message()).await.is_err());
}

#[test]
fn test_empty_api_key_rejected() {
    let config = BrevoConfig {
        api_key: " ".to_string(),
        api_url: "http://localhost/v3/smtp/email".to_string(),
        timeout_seconds: 10,
    };
    let result = BrevoEmailChannel::new(config, SenderIdentity::default());
    assert!(matches!(result, Err(InfrastructureError::Config(_))));
}
