//! Outbound email configuration
//!
//! Channels are optional: a channel whose credentials are absent is simply
//! not part of the delivery chain. The chain order itself is fixed by the
//! dispatcher (HTTP API, then SMTP, then local sendmail).

use serde::{Deserialize, Serialize};

use super::{env_non_empty, env_or};

/// Default endpoint of the Brevo transactional email API
pub const DEFAULT_BREVO_API_URL: &str = "https://api.brevo.com/v3/smtp/email";

/// Sender identity placed in the From header of every message
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct SenderIdentity {
    pub address: String,
    pub name: String,
}

impl Default for SenderIdentity {
    fn default() -> Self {
        Self {
            address: String::from("no-reply@vetclinic.local"),
            name: String::from("VetClinic"),
        }
    }
}

/// Transactional email HTTP API settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BrevoConfig {
    pub api_key: String,
    pub api_url: String,
    pub timeout_seconds: u64,
}

/// Implicit TLS (usually port 465) or STARTTLS upgrade (usually 587)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpEncryption {
    Tls,
    StartTls,
}

impl std::str::FromStr for SmtpEncryption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tls" | "ssl" | "smtps" => Ok(SmtpEncryption::Tls),
            "starttls" | "start_tls" => Ok(SmtpEncryption::StartTls),
            _ => Err(format!("Invalid SMTP encryption: {}", s)),
        }
    }
}

/// Authenticated SMTP relay settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub encryption: SmtpEncryption,
    pub timeout_seconds: u64,
}

/// Local mail transfer agent settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SendmailConfig {
    pub enabled: bool,
    /// Path to the sendmail binary; the system default when unset
    pub command: Option<String>,
}

impl Default for SendmailConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: None,
        }
    }
}

/// Advisory email-address validation API settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailValidationConfig {
    pub api_key: String,
    pub api_url: String,
    pub timeout_seconds: u64,
}

/// Complete outbound email configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct EmailConfig {
    /// From identity
    pub sender: SenderIdentity,

    /// Clinic name used in subjects and message bodies
    pub clinic_name: String,

    /// HTTP API channel, present only when an API key is configured
    pub brevo: Option<BrevoConfig>,

    /// SMTP channel, present only when host and credentials are configured
    pub smtp: Option<SmtpConfig>,

    /// Local sendmail fallback
    #[serde(default)]
    pub sendmail: SendmailConfig,

    /// Address validation, present only when an API key and URL are configured
    pub validation: Option<EmailValidationConfig>,
}

impl EmailConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = SenderIdentity::default();
        let sender = SenderIdentity {
            address: env_non_empty("MAIL_FROM_ADDRESS").unwrap_or(defaults.address),
            name: env_non_empty("MAIL_FROM_NAME").unwrap_or(defaults.name),
        };
        let clinic_name = env_non_empty("CLINIC_NAME").unwrap_or_else(|| sender.name.clone());

        let brevo = env_non_empty("BREVO_API_KEY").map(|api_key| BrevoConfig {
            api_key,
            api_url: env_non_empty("BREVO_API_URL")
                .unwrap_or_else(|| DEFAULT_BREVO_API_URL.to_string()),
            timeout_seconds: clamp_timeout(env_or("BREVO_TIMEOUT_SECONDS", 15)),
        });

        let smtp = match (
            env_non_empty("SMTP_HOST"),
            env_non_empty("SMTP_USERNAME"),
            env_non_empty("SMTP_PASSWORD"),
        ) {
            (Some(host), Some(username), Some(password)) => {
                let encryption = env_non_empty("SMTP_ENCRYPTION")
                    .and_then(|e| e.parse().ok())
                    .unwrap_or(SmtpEncryption::StartTls);
                let default_port = match encryption {
                    SmtpEncryption::Tls => 465,
                    SmtpEncryption::StartTls => 587,
                };
                Some(SmtpConfig {
                    host,
                    port: env_or("SMTP_PORT", default_port),
                    username,
                    password,
                    encryption,
                    timeout_seconds: clamp_timeout(env_or("SMTP_TIMEOUT_SECONDS", 15)),
                })
            }
            _ => None,
        };

        let sendmail = SendmailConfig {
            enabled: env_or("SENDMAIL_ENABLED", true),
            command: env_non_empty("SENDMAIL_COMMAND"),
        };

        let validation = match (
            env_non_empty("EMAIL_VALIDATION_API_KEY"),
            env_non_empty("EMAIL_VALIDATION_API_URL"),
        ) {
            (Some(api_key), Some(api_url)) => Some(EmailValidationConfig {
                api_key,
                api_url,
                timeout_seconds: 10,
            }),
            _ => None,
        };

        Self {
            sender,
            clinic_name,
            brevo,
            smtp,
            sendmail,
            validation,
        }
    }
}

/// Outbound provider calls are bounded to 10..=20 seconds per channel.
fn clamp_timeout(seconds: u64) -> u64 {
    seconds.clamp(10, 20)
}
