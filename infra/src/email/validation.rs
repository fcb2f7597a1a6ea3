//! Advisory email-address validation
//!
//! Queries an external deliverability API before dispatch. The verdict is
//! recorded in logs only: an address judged invalid is still sent to, and a
//! failed lookup is reported as [`AddressVerdict::Unknown`].

use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

use vc_shared::config::EmailValidationConfig;
use vc_shared::utils::email::mask_email;

use crate::InfrastructureError;

/// Result of an address lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressVerdict {
    Valid,
    Invalid,
    Unknown,
}

impl AddressVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            AddressVerdict::Valid => "valid",
            AddressVerdict::Invalid => "invalid",
            AddressVerdict::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Deserialize)]
struct ValidationResponse {
    #[serde(default)]
    deliverability: Option<String>,
}

/// Client for the address validation API
pub struct EmailAddressValidator {
    client: reqwest::Client,
    config: EmailValidationConfig,
}

impl EmailAddressValidator {
    pub fn new(config: EmailValidationConfig) -> Result<Self, InfrastructureError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self { client, config })
    }

    /// Look up `email`; never fails
    pub async fn validate(&self, email: &str) -> AddressVerdict {
        match self.lookup(email).await {
            Ok(verdict) => verdict,
            Err(e) => {
                warn!(
                    email = %mask_email(email),
                    error = %e,
                    "Email validation lookup failed"
                );
                AddressVerdict::Unknown
            }
        }
    }

    async fn lookup(&self, email: &str) -> Result<AddressVerdict, InfrastructureError> {
        let response = self
            .client
            .get(&self.config.api_url)
            .query(&[("api_key", self.config.api_key.as_str()), ("email", email)])
            .send()
            .await?
            .error_for_status()?;

        let body: ValidationResponse = response.json().await?;

        Ok(match body.deliverability.as_deref() {
            Some(d) if d.eq_ignore_ascii_case("DELIVERABLE") => AddressVerdict::Valid,
            Some(d) if d.eq_ignore_ascii_case("UNDELIVERABLE") => AddressVerdict::Invalid,
            _ => AddressVerdict::Unknown,
        })
    }
}
