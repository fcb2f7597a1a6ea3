//! Shared utilities and common types for the VetClinic server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - Response structures returned by the JSON endpoints
//! - Email address utilities (normalization, validation, masking)

pub mod config;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CorsConfig, DatabaseConfig, EmailConfig, Environment, LoggingConfig, OtpConfig,
    ServerConfig,
};
pub use types::{HealthResponse, HealthStatus, MessageResponse};
pub use utils::email;
