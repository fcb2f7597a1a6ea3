//! Brevo transactional email channel
//!
//! Sends through the Brevo HTTP API (`POST /v3/smtp/email`). Any 2xx response
//! counts as accepted; everything else, including timeouts, is a failure the
//! dispatcher falls through on.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use vc_shared::config::{BrevoConfig, SenderIdentity};
use vc_shared::utils::email::mask_email;

use super::{EmailChannel, EmailMessage};
use crate::InfrastructureError;

#[derive(Debug, Serialize)]
struct BrevoContact<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BrevoSendRequest<'a> {
    sender: BrevoContact<'a>,
    to: Vec<BrevoContact<'a>>,
    subject: &'a str,
    html_content: &'a str,
    text_content: &'a str,
}

/// Email channel backed by the Brevo HTTP API
pub struct BrevoEmailChannel {
    client: reqwest::Client,
    config: BrevoConfig,
    sender: SenderIdentity,
}

impl BrevoEmailChannel {
    /// Create the channel with a client bounded by the configured timeout
    pub fn new(config: BrevoConfig, sender: SenderIdentity) -> Result<Self, InfrastructureError> {
        if config.api_key.trim().is_empty() {
            return Err(InfrastructureError::Config(
                "Brevo API key is empty".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            config,
            sender,
        })
    }
}

#[async_trait]
impl EmailChannel for BrevoEmailChannel {
    async fn send(&self, message: &EmailMessage) -> Result<(), InfrastructureError> {
        let body = BrevoSendRequest {
            sender: BrevoContact {
                email: &self.sender.address,
                name: Some(&self.sender.name),
            },
            to: vec![BrevoContact {
                email: &message.to,
                name: None,
            }],
            subject: &message.subject,
            html_content: &message.html_body,
            text_content: &message.text_body,
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .header("api-key", &self.config.api_key)
            .header("accept", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!(
                provider = "brevo",
                email = %mask_email(&message.to),
                status = status.as_u16(),
                "Brevo accepted message"
            );
            return Ok(());
        }

        let detail = response.text().await.unwrap_or_default();
        warn!(
            provider = "brevo",
            email = %mask_email(&message.to),
            status = status.as_u16(),
            "Brevo rejected message"
        );
        Err(InfrastructureError::Email(format!(
            "Brevo returned {}: {}",
            status.as_u16(),
            detail.chars().take(200).collect::<String>()
        )))
    }

    fn channel_name(&self) -> &str {
        "brevo"
    }
}
