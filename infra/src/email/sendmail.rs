//! Local sendmail channel
//!
//! Last resort when no remote provider accepts the message. Sends the
//! plain-text body only.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::{AsyncSendmailTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use vc_shared::config::SenderIdentity;
use vc_shared::utils::email::mask_email;

use super::smtp::parse_mailbox;
use super::{EmailChannel, EmailMessage};
use crate::InfrastructureError;

/// Email channel that pipes messages to the local MTA
pub struct SendmailEmailChannel {
    transport: AsyncSendmailTransport<Tokio1Executor>,
    sender: SenderIdentity,
}

impl SendmailEmailChannel {
    /// Use `command` as the sendmail binary, or the system default
    pub fn new(sender: SenderIdentity, command: Option<&str>) -> Self {
        let transport = match command {
            Some(command) => AsyncSendmailTransport::<Tokio1Executor>::new_with_command(command),
            None => AsyncSendmailTransport::<Tokio1Executor>::new(),
        };
        Self { transport, sender }
    }
}

#[async_trait]
impl EmailChannel for SendmailEmailChannel {
    async fn send(&self, message: &EmailMessage) -> Result<(), InfrastructureError> {
        let email = Message::builder()
            .from(parse_mailbox(Some(&self.sender.name), &self.sender.address)?)
            .to(parse_mailbox(None, &message.to)?)
            .subject(message.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(message.text_body.clone())
            .map_err(|e| InfrastructureError::Email(format!("Failed to build message: {}", e)))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| InfrastructureError::Email(format!("sendmail failed: {}", e)))?;

        debug!(
            provider = "sendmail",
            email = %mask_email(&message.to),
            "Handed message to local MTA"
        );
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "sendmail"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binary_is_a_failure() {
        let channel = SendmailEmailChannel::new(
            SenderIdentity::default(),
            Some("/nonexistent/vetclinic-sendmail"),
        );
        let message = EmailMessage {
            to: "pet@owner.example".to_string(),
            subject: "Code".to_string(),
            html_body: String::new(),
            text_body: "123456".to_string(),
        };

        let result = channel.send(&message).await;
        assert!(matches!(result, Err(InfrastructureError::Email(_))));
    }
}
