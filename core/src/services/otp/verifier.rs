//! Code verification state machine

use std::sync::Arc;
use tracing;

use vc_shared::config::OtpConfig;
use vc_shared::utils::email::{mask_email, normalize_email};

use crate::errors::{DomainError, DomainResult};
use crate::repositories::OtpRepository;

use super::clock::{Clock, SystemClock};
use super::types::VerifyOutcome;

/// Verifies submitted codes against the current record for an email
pub struct OtpVerifier<R: OtpRepository> {
    otps: Arc<R>,
    config: OtpConfig,
    clock: Arc<dyn Clock>,
}

impl<R: OtpRepository> OtpVerifier<R> {
    pub fn new(otps: Arc<R>, config: OtpConfig) -> Self {
        Self {
            otps,
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Verify `submitted` for `email`
    ///
    /// Rules are applied in order against the current record only:
    /// missing record, already used, expired, wrong code (the failure is
    /// counted), then success. Success marks the record used and the owner
    /// verified atomically.
    ///
    /// # Returns
    ///
    /// * `Ok(VerifyOutcome)` - The state-machine result
    /// * `Err(DomainError::Validation)` - Empty email or malformed code
    /// * `Err(DomainError::Internal)` - The success transaction was rolled back
    /// * `Err(DomainError::Database)` - The store failed while reading or
    ///   counting a failed attempt
    pub async fn verify_otp(&self, email: &str, submitted: &str) -> DomainResult<VerifyOutcome> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(DomainError::Validation {
                message: "Email is required".to_string(),
            });
        }

        let submitted = submitted.trim();
        if submitted.len() != self.config.code_length
            || !submitted.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(DomainError::Validation {
                message: format!("Code must be {} digits", self.config.code_length),
            });
        }

        let masked = mask_email(&email);

        let Some(record) = self.otps.find_current(&email).await? else {
            tracing::info!(email = %masked, event = "otp_not_found", "No code issued for email");
            return Ok(VerifyOutcome::NotFound);
        };

        if record.used {
            tracing::warn!(
                email = %masked,
                otp_id = record.id,
                event = "otp_already_used",
                "Attempt to reuse a consumed code"
            );
            return Ok(VerifyOutcome::AlreadyUsed);
        }

        if record.is_expired_at(self.clock.now()) {
            tracing::info!(
                email = %masked,
                otp_id = record.id,
                event = "otp_expired",
                "Submitted code has expired"
            );
            return Ok(VerifyOutcome::Expired);
        }

        if !record.matches(submitted) {
            let attempts = self.otps.record_failed_attempt(record.id).await?;
            tracing::warn!(
                email = %masked,
                otp_id = record.id,
                attempts = attempts,
                event = "otp_mismatch",
                "Submitted code does not match"
            );
            return Ok(VerifyOutcome::Mismatch { attempts });
        }

        match self.otps.mark_verified(record.id, record.user_id).await {
            Ok(true) => {
                tracing::info!(
                    email = %masked,
                    otp_id = record.id,
                    user_id = record.user_id,
                    event = "otp_verified",
                    "Email verified"
                );
                Ok(VerifyOutcome::Verified {
                    user_id: record.user_id,
                })
            }
            // A concurrent request consumed the code between read and update
            Ok(false) => {
                tracing::warn!(
                    email = %masked,
                    otp_id = record.id,
                    event = "otp_already_used",
                    "Code consumed concurrently"
                );
                Ok(VerifyOutcome::AlreadyUsed)
            }
            Err(e) => {
                tracing::error!(
                    email = %masked,
                    otp_id = record.id,
                    error = %e,
                    event = "otp_verification_failed",
                    "Verification transaction rolled back"
                );
                Err(DomainError::Internal {
                    message: "Verification could not be completed".to_string(),
                })
            }
        }
    }
}
