//! MySQL-specific database implementations
//!
//! This module contains MySQL implementations of repository traits
//! using SQLx for database operations.

pub mod otp_repository_impl;
pub mod user_repository_impl;

// Re-export the MySQL implementations
pub use otp_repository_impl::MySqlOtpRepository;
pub use user_repository_impl::MySqlUserRepository;

use vc_core::errors::DomainError;

/// Wrap a driver error with the operation that failed
pub(crate) fn db_error(context: &str, err: sqlx::Error) -> DomainError {
    DomainError::Database {
        message: format!("{}: {}", context, err),
    }
}
