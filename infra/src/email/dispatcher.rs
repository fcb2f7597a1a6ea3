//! Ordered email delivery with fallthrough

use async_trait::async_trait;
use tracing::{info, warn};

use vc_core::services::otp::OtpNotifier;
use vc_shared::utils::email::mask_email;

use super::template::{EmailMessage, OtpEmailTemplate};
use super::validation::{AddressVerdict, EmailAddressValidator};
use super::EmailChannel;

/// A channel that was tried and failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelFailure {
    pub channel: String,
    pub error: String,
}

/// What happened to one message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Channel that accepted the message, if any
    pub delivered_by: Option<String>,
    /// Channels tried before it, in order
    pub failures: Vec<ChannelFailure>,
}

impl DispatchReport {
    pub fn is_delivered(&self) -> bool {
        self.delivered_by.is_some()
    }
}

/// Sends verification emails through the first channel that accepts them
///
/// Channels are tried strictly in the order given. Once one succeeds, the
/// rest are not called. The dispatcher never returns an error; the report
/// (or the boolean from [`OtpNotifier::send_otp_email`]) says whether the
/// message went out.
pub struct NotificationDispatcher {
    channels: Vec<Box<dyn EmailChannel>>,
    template: OtpEmailTemplate,
    validator: Option<EmailAddressValidator>,
}

impl NotificationDispatcher {
    pub fn new(channels: Vec<Box<dyn EmailChannel>>, template: OtpEmailTemplate) -> Self {
        let names: Vec<&str> = channels.iter().map(|c| c.channel_name()).collect();
        info!(channels = ?names, "Initializing notification dispatcher");

        Self {
            channels,
            template,
            validator: None,
        }
    }

    /// Attach an address validator consulted before each dispatch
    pub fn with_validator(mut self, validator: Option<EmailAddressValidator>) -> Self {
        self.validator = validator;
        self
    }

    /// Names of the configured channels in priority order
    pub fn channel_names(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.channel_name()).collect()
    }

    /// Render and deliver a code to `email`
    pub async fn dispatch(&self, email: &str, code: &str) -> DispatchReport {
        let masked = mask_email(email);

        if let Some(validator) = &self.validator {
            let verdict = validator.validate(email).await;
            if verdict == AddressVerdict::Invalid {
                warn!(
                    email = %masked,
                    verdict = verdict.as_str(),
                    event = "email_address_suspect",
                    "Address failed validation; sending anyway"
                );
            } else {
                info!(
                    email = %masked,
                    verdict = verdict.as_str(),
                    "Address validation result"
                );
            }
        }

        let message = self.template.render(email, code);
        self.deliver(&message).await
    }

    async fn deliver(&self, message: &EmailMessage) -> DispatchReport {
        let masked = mask_email(&message.to);
        let mut report = DispatchReport::default();

        for channel in &self.channels {
            match channel.send(message).await {
                Ok(()) => {
                    info!(
                        email = %masked,
                        channel = channel.channel_name(),
                        failed_channels = report.failures.len(),
                        event = "email_dispatched",
                        "Verification email sent"
                    );
                    report.delivered_by = Some(channel.channel_name().to_string());
                    return report;
                }
                Err(e) => {
                    warn!(
                        email = %masked,
                        channel = channel.channel_name(),
                        error = %e,
                        event = "email_channel_failed",
                        "Email channel failed, trying next"
                    );
                    report.failures.push(ChannelFailure {
                        channel: channel.channel_name().to_string(),
                        error: e.to_string(),
                    });
                }
            }
        }

        warn!(
            email = %masked,
            attempted = report.failures.len(),
            event = "email_dispatch_exhausted",
            "No email channel accepted the message"
        );
        report
    }
}

#[async_trait]
impl OtpNotifier for NotificationDispatcher {
    async fn send_otp_email(&self, email: &str, code: &str) -> bool {
        self.dispatch(email, code).await.is_delivered()
    }
}
