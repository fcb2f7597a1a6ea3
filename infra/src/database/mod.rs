//! Database module - MySQL implementations using SQLx
//!
//! This module provides database access layer implementations including:
//! - Connection pool management
//! - The OTP store and user directory over the `users`, `otp_codes` and
//!   `otp_current` tables (see `sql/schema.sql`)

pub mod connection;
pub mod mysql;

// Re-export commonly used types
pub use connection::DatabasePool;
pub use mysql::{MySqlOtpRepository, MySqlUserRepository};
