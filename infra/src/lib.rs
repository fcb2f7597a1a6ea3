//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the VetClinic OTP
//! service, following Clean Architecture principles. It provides concrete
//! implementations of the core repository traits and the outbound email
//! channels.
//!
//! ## Architecture
//!
//! - **Database**: MySQL implementations using SQLx
//! - **Email**: HTTP API, SMTP and sendmail channels behind one ordered
//!   dispatcher, plus an advisory address validator
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)

use vc_core::errors::DomainError;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Email module - delivery channels and the notification dispatcher
pub mod email;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection or query error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Email building or transport error
    #[error("Email error: {0}")]
    Email(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        match err {
            InfrastructureError::Database(e) => DomainError::Database {
                message: e.to_string(),
            },
            other => DomainError::Internal {
                message: other.to_string(),
            },
        }
    }
}
