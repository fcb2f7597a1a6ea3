//! SMTP relay channel
//!
//! Uses lettre's async transport. Implicit TLS and STARTTLS are both
//! supported; the message carries plain-text and HTML alternatives.

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;
use tracing::debug;

use vc_shared::config::{SenderIdentity, SmtpConfig, SmtpEncryption};
use vc_shared::utils::email::mask_email;

use super::{EmailChannel, EmailMessage};
use crate::InfrastructureError;

/// Email channel backed by an authenticated SMTP relay
pub struct SmtpEmailChannel {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: SenderIdentity,
}

impl SmtpEmailChannel {
    /// Build the transport; no connection is opened until the first send
    pub fn new(config: &SmtpConfig, sender: SenderIdentity) -> Result<Self, InfrastructureError> {
        let builder = match config.encryption {
            SmtpEncryption::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host),
            SmtpEncryption::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            }
        }
        .map_err(|e| InfrastructureError::Config(format!("Invalid SMTP relay: {}", e)))?;

        let transport = builder
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .timeout(Some(Duration::from_secs(config.timeout_seconds)))
            .build();

        Ok(Self { transport, sender })
    }
}

/// Build a multipart/alternative message from the rendered email
pub(crate) fn build_message(
    sender: &SenderIdentity,
    message: &EmailMessage,
) -> Result<Message, InfrastructureError> {
    let from = parse_mailbox(Some(&sender.name), &sender.address)?;
    let to = parse_mailbox(None, &message.to)?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(message.subject.clone())
        .multipart(MultiPart::alternative_plain_html(
            message.text_body.clone(),
            message.html_body.clone(),
        ))
        .map_err(|e| InfrastructureError::Email(format!("Failed to build message: {}", e)))
}

pub(crate) fn parse_mailbox(name: Option<&str>, address: &str) -> Result<Mailbox, InfrastructureError> {
    let address = address
        .parse()
        .map_err(|e| InfrastructureError::Email(format!("Invalid address: {}", e)))?;
    Ok(Mailbox::new(name.map(str::to_string), address))
}

#[async_trait]
impl EmailChannel for SmtpEmailChannel {
    async fn send(&self, message: &EmailMessage) -> Result<(), InfrastructureError> {
        let email = build_message(&self.sender, message)?;

        let response = self
            .transport
            .send(email)
            .await
            .map_err(|e| InfrastructureError::Email(format!("SMTP send failed: {}", e)))?;

        debug!(
            provider = "smtp",
            email = %mask_email(&message.to),
            code = %response.code(),
            "SMTP relay accepted message"
        );
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "smtp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EmailMessage {
        EmailMessage {
            to: "pet@owner.example".to_string(),
            subject: "VetClinic verification code".to_string(),
            html_body: "<p>123456</p>".to_string(),
            text_body: "123456".to_string(),
        }
    }

    #[test]
    fn test_build_message_sets_headers() {
        let message = build_message(&SenderIdentity::default(), &sample()).unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();

        assert!(formatted.contains("From: VetClinic <no-reply@vetclinic.local>"));
        assert!(formatted.contains("To: pet@owner.example"));
        assert!(formatted.contains("multipart/alternative"));
    }

    #[test]
    fn test_build_message_rejects_bad_recipient() {
        let mut bad = sample();
        bad.to = "not an address".to_string();

        let result = build_message(&SenderIdentity::default(), &bad);
        assert!(matches!(result, Err(InfrastructureError::Email(_))));
    }

    #[test]
    fn test_accepted_addresses_build_messages() {
        let addresses = [
            "owner@clinic.example",
            "a+b@sub.domain.org",
            "first.last@vet.example",
            "o'brien@vet.example",
        ];
        for address in addresses {
            assert!(vc_shared::email::is_valid_email(address), "{}", address);

            let mut message = sample();
            message.to = address.to_string();
            assert!(build_message(&SenderIdentity::default(), &message).is_ok(), "{}", address);
        }

        let long_local = format!("{}@vet.example", "a".repeat(64));
        assert!(vc_shared::email::is_valid_email(&long_local));
        let mut message = sample();
        message.to = long_local;
        assert!(build_message(&SenderIdentity::default(), &message).is_ok());
    }

    #[tokio::test]
    async fn test_new_builds_both_encryption_modes() {
        for encryption in [SmtpEncryption::Tls, SmtpEncryption::StartTls] {
            let config = SmtpConfig {
                host: "smtp.example.com".to_string(),
                port: 2525,
                username: "clinic".to_string(),
                password: "secret".to_string(),
                encryption,
                timeout_seconds: 10,
            };
            let channel = SmtpEmailChannel::new(&config, SenderIdentity::default()).unwrap();
            assert_eq!(channel.channel_name(), "smtp");
        }
    }
}
