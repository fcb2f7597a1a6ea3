//! User entity, limited to the fields the OTP flow touches.

use chrono::{DateTime, Utc};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, DomainResult};

/// Work factor for hashing the placeholder password of implicit accounts.
/// The secret is 32 random bytes and never shown to anyone.
pub const PLACEHOLDER_HASH_COST: u32 = 8;

/// Width of the `users.display_name` column, in characters
pub const MAX_DISPLAY_NAME_LENGTH: usize = 100;

/// Role of a portal account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Pet owner
    #[default]
    Owner,
    /// Clinic staff member
    Staff,
    /// Administrator
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Owner => "owner",
            UserRole::Staff => "staff",
            UserRole::Admin => "admin",
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(UserRole::Owner),
            "staff" => Ok(UserRole::Staff),
            "admin" => Ok(UserRole::Admin),
            other => Err(DomainError::Validation {
                message: format!("Unknown user role: {}", other),
            }),
        }
    }
}

/// Portal account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub display_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    /// Set on the first successful code verification
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

/// An account about to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub display_name: String,
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl NewUser {
    /// Builds the unverified owner account created when a code is requested
    /// for an unknown address.
    ///
    /// The display name is the trimmed hint when one is given, otherwise the
    /// local part of the email. Either is cut to [`MAX_DISPLAY_NAME_LENGTH`]
    /// characters.
    pub fn implicit_owner(
        email: &str,
        display_name_hint: Option<&str>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let display_name = display_name_hint
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| vc_shared::email::local_part(email))
            .chars()
            .take(MAX_DISPLAY_NAME_LENGTH)
            .collect();

        Ok(Self {
            email: email.to_string(),
            display_name,
            password_hash: placeholder_password_hash()?,
            role: UserRole::Owner,
            created_at: now,
        })
    }

    /// Materializes the account once the store has assigned an id
    pub fn into_user(self, id: i64) -> User {
        User {
            id,
            email: self.email,
            display_name: self.display_name,
            password_hash: self.password_hash,
            role: self.role,
            is_verified: false,
            created_at: self.created_at,
        }
    }
}

fn placeholder_password_hash() -> DomainResult<String> {
    let mut secret = [0u8; 32];
    OsRng.fill_bytes(&mut secret);

    bcrypt::hash(hex::encode(secret), PLACEHOLDER_HASH_COST).map_err(|e| DomainError::Internal {
        message: format!("Failed to hash placeholder password: {}", e),
    })
}
