//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `database` - Database connection and pool configuration
//! - `email` - Sender identity and the ordered delivery channels
//! - `environment` - Environment detection and logging configuration
//! - `otp` - One-time code length, lifetime and re-issue interval
//! - `server` - HTTP server and CORS configuration

pub mod database;
pub mod email;
pub mod environment;
pub mod otp;
pub mod server;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

// Re-export commonly used types
pub use database::DatabaseConfig;
pub use email::{
    BrevoConfig, EmailConfig, EmailValidationConfig, SendmailConfig, SenderIdentity, SmtpConfig,
    SmtpEncryption,
};
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use otp::OtpConfig;
pub use server::{CorsConfig, ServerConfig};

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// OTP issuance and verification policy
    pub otp: OtpConfig,

    /// Outbound email configuration
    pub email: EmailConfig,

    /// CORS configuration
    #[serde(default)]
    pub cors: CorsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            otp: OtpConfig::default(),
            email: EmailConfig::default(),
            cors: CorsConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment
    pub fn from_env() -> Self {
        let environment = Environment::from_env();
        Self {
            environment,
            server: ServerConfig::from_env(),
            database: DatabaseConfig::from_env(),
            otp: OtpConfig::from_env(),
            email: EmailConfig::from_env(),
            cors: CorsConfig::from_env(),
            logging: LoggingConfig::from_env(environment),
        }
    }
}

/// Read an environment variable, falling back to `default` when it is
/// missing or does not parse.
pub(crate) fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Read an environment variable that must be non-blank to count as set.
pub(crate) fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_or_falls_back_on_garbage() {
        temp_env::with_vars([("VC_TEST_NUMBER", Some("not-a-number"))], || {
            assert_eq!(env_or("VC_TEST_NUMBER", 42u32), 42);
        });
        temp_env::with_vars([("VC_TEST_NUMBER", Some(" 7 "))], || {
            assert_eq!(env_or("VC_TEST_NUMBER", 42u32), 7);
        });
    }

    #[test]
    fn test_env_non_empty_ignores_blank_values() {
        temp_env::with_vars([("VC_TEST_KEY", Some("   "))], || {
            assert_eq!(env_non_empty("VC_TEST_KEY"), None);
        });
        temp_env::with_vars([("VC_TEST_KEY", None::<&str>)], || {
            assert_eq!(env_non_empty("VC_TEST_KEY"), None);
        });
        temp_env::with_vars([("VC_TEST_KEY", Some("abc"))], || {
            assert_eq!(env_non_empty("VC_TEST_KEY").as_deref(), Some("abc"));
        });
    }

    #[test]
    fn test_default_config_uses_development_logging() {
        let config = AppConfig::default();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.otp.ttl_minutes, 10);
    }
}
