//! Domain-specific error types and error handling.

use thiserror::Error;

/// Core domain errors
///
/// State-machine results of issuing and verifying codes (rate limited,
/// expired, mismatch...) are not errors; they are reported through
/// [`crate::services::otp::IssueOutcome`] and
/// [`crate::services::otp::VerifyOutcome`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Database error: {message}")]
    Database { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

pub type DomainResult<T> = Result<T, DomainError>;
