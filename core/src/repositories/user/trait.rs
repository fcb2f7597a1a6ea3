//! User directory trait used by the OTP issuer.

use async_trait::async_trait;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Read access to portal accounts
///
/// Accounts are created by the OTP store inside the issuance transaction
/// (see [`crate::repositories::OtpRepository::create_for_owner`]), so this
/// trait only exposes lookups.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by normalized email address
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user registered with this email
    /// * `Err(DomainError)` - Database or other error occurred
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by identifier
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DomainError>;
}
