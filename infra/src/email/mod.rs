//! Email Delivery Module
//!
//! Delivers one-time codes by email through an ordered chain of channels:
//!
//! 1. **Brevo**: transactional email HTTP API
//! 2. **SMTP**: authenticated relay over implicit TLS or STARTTLS
//! 3. **Sendmail**: local mail transfer agent, plain text only
//!
//! The [`NotificationDispatcher`] stops at the first channel that accepts the
//! message. An optional [`EmailAddressValidator`] is consulted first; its
//! verdict is only logged.

use async_trait::async_trait;

pub mod brevo;
pub mod dispatcher;
pub mod mock;
pub mod sendmail;
pub mod smtp;
pub mod template;
pub mod validation;

#[cfg(test)]
mod tests;

pub use brevo::BrevoEmailChannel;
pub use dispatcher::{ChannelFailure, DispatchReport, NotificationDispatcher};
pub use mock::MockEmailChannel;
pub use sendmail::SendmailEmailChannel;
pub use smtp::SmtpEmailChannel;
pub use template::{EmailMessage, OtpEmailTemplate};
pub use validation::{AddressVerdict, EmailAddressValidator};

use vc_shared::config::EmailConfig;

use crate::InfrastructureError;

/// A single way of delivering an email
#[async_trait]
pub trait EmailChannel: Send + Sync {
    /// Deliver the message
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The channel accepted the message
    /// * `Err(InfrastructureError)` - The channel failed; the caller moves on
    async fn send(&self, message: &EmailMessage) -> Result<(), InfrastructureError>;

    /// Name used in logs and dispatch reports
    fn channel_name(&self) -> &str;
}

/// Build the dispatcher from configuration
///
/// Channels are added in priority order when configured. A channel that
/// cannot be initialised is logged and left out of the chain.
///
/// # Arguments
///
/// * `config` - Sender identity and channel settings
/// * `ttl_minutes` - Code lifetime quoted in the message body
pub fn create_dispatcher(config: &EmailConfig, ttl_minutes: i64) -> NotificationDispatcher {
    let mut channels: Vec<Box<dyn EmailChannel>> = Vec::new();

    if let Some(brevo) = &config.brevo {
        match BrevoEmailChannel::new(brevo.clone(), config.sender.clone()) {
            Ok(channel) => channels.push(Box::new(channel)),
            Err(e) => tracing::error!(error = %e, "Failed to initialize Brevo email channel"),
        }
    }

    if let Some(smtp) = &config.smtp {
        match SmtpEmailChannel::new(smtp, config.sender.clone()) {
            Ok(channel) => channels.push(Box::new(channel)),
            Err(e) => tracing::error!(error = %e, "Failed to initialize SMTP email channel"),
        }
    }

    if config.sendmail.enabled {
        channels.push(Box::new(SendmailEmailChannel::new(
            config.sender.clone(),
            config.sendmail.command.as_deref(),
        )));
    }

    if channels.is_empty() {
        tracing::warn!("No email channel configured; codes will not be delivered");
    }

    let validator = config.validation.as_ref().and_then(|validation| {
        EmailAddressValidator::new(validation.clone())
            .map_err(|e| tracing::error!(error = %e, "Failed to initialize email validator"))
            .ok()
    });

    let template = OtpEmailTemplate::new(config.clinic_name.clone(), ttl_minutes);

    NotificationDispatcher::new(channels, template).with_validator(validator)
}
