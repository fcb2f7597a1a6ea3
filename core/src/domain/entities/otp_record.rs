//! One-time code entity for email verification.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use serde::{Deserialize, Serialize};

/// A persisted one-time code
///
/// Records are never deleted by the OTP flow. Only the newest record for an
/// email is consulted; older ones are superseded on every issuance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpRecord {
    /// Store-assigned identifier, increasing with every issuance
    pub id: i64,

    /// Owner of the code
    pub user_id: i64,

    /// Destination address at the time of issuance (normalized)
    pub email: String,

    /// Zero-padded decimal code
    pub code: String,

    /// Issuance timestamp (UTC)
    pub created_at: DateTime<Utc>,

    /// Fixed at issuance, never extended
    pub expires_at: DateTime<Utc>,

    /// Set exactly once on successful verification
    pub used: bool,

    /// Failed comparisons against this record
    pub attempts: i32,
}

impl OtpRecord {
    /// Checks if the code has expired at `now`
    ///
    /// A code is still valid at the exact expiry instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Compares a submitted code in constant time
    pub fn matches(&self, submitted: &str) -> bool {
        constant_time_eq(self.code.as_bytes(), submitted.as_bytes())
    }

    /// Time elapsed since issuance
    pub fn age_at(&self, now: DateTime<Utc>) -> Duration {
        now - self.created_at
    }
}

/// A code about to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOtpRecord {
    pub email: String,
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl NewOtpRecord {
    /// Creates an unsaved record valid for `ttl_minutes` from `now`
    pub fn new(email: impl Into<String>, code: impl Into<String>, now: DateTime<Utc>, ttl_minutes: i64) -> Self {
        Self {
            email: email.into(),
            code: code.into(),
            created_at: now,
            expires_at: now + Duration::minutes(ttl_minutes),
        }
    }

    /// Materializes the record once the store has assigned ids
    pub fn into_record(self, id: i64, user_id: i64) -> OtpRecord {
        OtpRecord {
            id,
            user_id,
            email: self.email,
            code: self.code,
            created_at: self.created_at,
            expires_at: self.expires_at,
            used: false,
            attempts: 0,
        }
    }
}
