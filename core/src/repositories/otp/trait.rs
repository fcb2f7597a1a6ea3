//! OTP store trait defining persistence of issued codes.
//!
//! The store keeps an explicit `email -> current record` index that is
//! updated in the same transaction as the insert. "Latest code for an
//! email" is always read through that index.

use async_trait::async_trait;

use crate::domain::entities::otp_record::{NewOtpRecord, OtpRecord};
use crate::domain::entities::user::{NewUser, User};
use crate::errors::DomainError;

/// Who owns a code about to be inserted
#[derive(Debug, Clone)]
pub enum OtpOwner {
    /// An account that already exists
    Existing(i64),
    /// Create this account unless one with the same email appears first
    Create(NewUser),
}

/// Result of an atomic owner-resolution plus insert
#[derive(Debug, Clone)]
pub struct IssuedRecord {
    pub record: OtpRecord,
    pub user: User,
    /// Whether the owning account was created by this call
    pub user_created: bool,
}

/// Repository trait for one-time code persistence
#[async_trait]
pub trait OtpRepository: Send + Sync {
    /// Current (newest) record for a normalized email
    ///
    /// # Returns
    /// * `Ok(Some(OtpRecord))` - The record the index points at
    /// * `Ok(None)` - No code was ever issued for this email
    /// * `Err(DomainError)` - Database error occurred
    async fn find_current(&self, email: &str) -> Result<Option<OtpRecord>, DomainError>;

    /// Resolve the owner, insert the record and repoint the current-record
    /// index, all in one transaction.
    ///
    /// For [`OtpOwner::Create`], an account with the same email that
    /// already exists when the transaction runs is reused instead.
    async fn create_for_owner(
        &self,
        owner: OtpOwner,
        record: NewOtpRecord,
    ) -> Result<IssuedRecord, DomainError>;

    /// Increment the failed-attempt counter and return the new value
    async fn record_failed_attempt(&self, otp_id: i64) -> Result<i32, DomainError>;

    /// Mark the record used and its owner verified in one transaction
    ///
    /// # Returns
    /// * `Ok(true)` - Both updates committed
    /// * `Ok(false)` - The record was already used; nothing changed
    /// * `Err(DomainError)` - The transaction was rolled back
    async fn mark_verified(&self, otp_id: i64, user_id: i64) -> Result<bool, DomainError>;

    /// Check that the backing store is reachable
    async fn health_check(&self) -> Result<(), DomainError> {
        Ok(())
    }
}
