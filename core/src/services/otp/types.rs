//! Outcomes of issuing and verifying codes

use chrono::{DateTime, Utc};

use crate::domain::entities::otp_record::OtpRecord;

/// A code that was persisted and handed to the notifier
#[derive(Debug, Clone)]
pub struct IssuedOtp {
    pub record: OtpRecord,
    /// Whether the owning account was created by this issuance
    pub user_created: bool,
    /// Whether any delivery channel accepted the message
    pub email_sent: bool,
    /// Earliest time another code may be issued for this email
    pub next_issue_at: DateTime<Utc>,
}

/// Result of an issuance request
#[derive(Debug, Clone)]
pub enum IssueOutcome {
    Issued(IssuedOtp),
    /// A code was issued too recently; nothing was created
    RateLimited { retry_after_seconds: i64 },
}

/// Result of a verification attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// Code accepted; the record is used and the owner verified
    Verified { user_id: i64 },
    /// No code was ever issued for this email
    NotFound,
    /// The current code was already consumed
    AlreadyUsed,
    Expired,
    /// Wrong code; `attempts` is the record's updated failure count
    Mismatch { attempts: i32 },
}

impl VerifyOutcome {
    pub fn is_verified(&self) -> bool {
        matches!(self, VerifyOutcome::Verified { .. })
    }
}
