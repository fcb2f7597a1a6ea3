//! Code issuance with a minimum re-issue interval

use chrono::Duration;
use std::sync::Arc;
use tracing;

use vc_shared::config::OtpConfig;
use vc_shared::utils::email::{mask_email, normalize_email};

use crate::domain::entities::otp_record::NewOtpRecord;
use crate::domain::entities::user::NewUser;
use crate::errors::{DomainError, DomainResult};
use crate::repositories::{OtpOwner, OtpRepository, UserRepository};

use super::clock::{Clock, SystemClock};
use super::code::{CodeGenerator, RandomCodeGenerator};
use super::traits::OtpNotifier;
use super::types::{IssueOutcome, IssuedOtp};

/// Issues one-time codes and hands them to the notifier
pub struct OtpIssuer<R: OtpRepository, U: UserRepository, N: OtpNotifier> {
    otps: Arc<R>,
    users: Arc<U>,
    notifier: Arc<N>,
    config: OtpConfig,
    clock: Arc<dyn Clock>,
    codes: Arc<dyn CodeGenerator>,
}

impl<R: OtpRepository, U: UserRepository, N: OtpNotifier> OtpIssuer<R, U, N> {
    /// Create an issuer using the system clock and OS randomness
    pub fn new(otps: Arc<R>, users: Arc<U>, notifier: Arc<N>, config: OtpConfig) -> Self {
        Self {
            otps,
            users,
            notifier,
            config,
            clock: Arc::new(SystemClock),
            codes: Arc::new(RandomCodeGenerator),
        }
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the code generator
    pub fn with_code_generator(mut self, codes: Arc<dyn CodeGenerator>) -> Self {
        self.codes = codes;
        self
    }

    pub fn config(&self) -> &OtpConfig {
        &self.config
    }

    /// Issue a code for `email`, creating an unverified owner account if no
    /// account uses that address yet.
    ///
    /// # Arguments
    ///
    /// * `email` - Recipient; normalized before use
    /// * `display_name_hint` - Display name for an account created by this call
    ///
    /// # Returns
    ///
    /// * `Ok(IssueOutcome::Issued)` - Code persisted; delivery result inside
    /// * `Ok(IssueOutcome::RateLimited)` - A code was issued too recently
    /// * `Err(DomainError)` - Empty email, or the store failed
    pub async fn issue_otp(
        &self,
        email: &str,
        display_name_hint: Option<&str>,
    ) -> DomainResult<IssueOutcome> {
        let email = Self::require_email(email)?;

        if let Some(outcome) = self.check_rate_limit(&email).await? {
            return Ok(outcome);
        }

        let owner = match self.users.find_by_email(&email).await? {
            Some(user) => OtpOwner::Existing(user.id),
            None => OtpOwner::Create(self.implicit_owner(&email, display_name_hint).await?),
        };

        self.issue_for(&email, owner).await
    }

    /// Issue a new code for an existing account only
    ///
    /// Unknown addresses yield `DomainError::NotFound`; the re-issue interval
    /// applies as for [`Self::issue_otp`].
    pub async fn resend_otp(&self, email: &str) -> DomainResult<IssueOutcome> {
        let email = Self::require_email(email)?;

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                resource: "User".to_string(),
            })?;

        if let Some(outcome) = self.check_rate_limit(&email).await? {
            return Ok(outcome);
        }

        self.issue_for(&email, OtpOwner::Existing(user.id)).await
    }

    // bcrypt is CPU-bound; hash on the blocking pool
    async fn implicit_owner(
        &self,
        email: &str,
        display_name_hint: Option<&str>,
    ) -> DomainResult<NewUser> {
        let email = email.to_string();
        let hint = display_name_hint.map(str::to_string);
        let now = self.clock.now();

        tokio::task::spawn_blocking(move || NewUser::implicit_owner(&email, hint.as_deref(), now))
            .await
            .map_err(|e| DomainError::Internal {
                message: format!("Placeholder password task failed: {}", e),
            })?
    }

    fn require_email(email: &str) -> DomainResult<String> {
        let email = normalize_email(email);
        if email.is_empty() {
            return Err(DomainError::Validation {
                message: "Email is required".to_string(),
            });
        }
        Ok(email)
    }

    async fn check_rate_limit(&self, email: &str) -> DomainResult<Option<IssueOutcome>> {
        let Some(current) = self.otps.find_current(email).await? else {
            return Ok(None);
        };

        let interval = Duration::seconds(self.config.resend_interval_seconds);
        let age = current.age_at(self.clock.now());
        if age >= interval {
            return Ok(None);
        }

        let remaining = interval - age;
        // Round partial seconds up so clients never retry too early
        let retry_after_seconds = (remaining.num_milliseconds() + 999) / 1000;
        tracing::warn!(
            email = %mask_email(email),
            retry_after_seconds = retry_after_seconds,
            event = "otp_rate_limited",
            "Code requested before the re-issue interval elapsed"
        );
        Ok(Some(IssueOutcome::RateLimited {
            retry_after_seconds,
        }))
    }

    async fn issue_for(&self, email: &str, owner: OtpOwner) -> DomainResult<IssueOutcome> {
        let now = self.clock.now();
        let code = self.codes.generate(self.config.code_length);
        let new_record = NewOtpRecord::new(email, code, now, self.config.ttl_minutes);

        let issued = self.otps.create_for_owner(owner, new_record).await.map_err(|e| {
            tracing::error!(
                email = %mask_email(email),
                error = %e,
                event = "otp_storage_failed",
                "Failed to persist one-time code"
            );
            e
        })?;

        tracing::info!(
            email = %mask_email(email),
            otp_id = issued.record.id,
            user_id = issued.user.id,
            user_created = issued.user_created,
            event = "otp_issued",
            "Issued one-time code"
        );

        // Delivery failure leaves the code valid; the user can ask for a resend.
        let email_sent = self
            .notifier
            .send_otp_email(email, &issued.record.code)
            .await;

        Ok(IssueOutcome::Issued(IssuedOtp {
            next_issue_at: issued.record.created_at
                + Duration::seconds(self.config.resend_interval_seconds),
            record: issued.record,
            user_created: issued.user_created,
            email_sent,
        }))
    }
}
