//! One-time code policy configuration

use serde::{Deserialize, Serialize};

use super::env_or;

/// Policy applied by the OTP issuer and verifier
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct OtpConfig {
    /// Number of decimal digits in a code
    pub code_length: usize,

    /// Minutes a code stays verifiable after issuance
    pub ttl_minutes: i64,

    /// Minimum seconds between two issuances for the same email
    pub resend_interval_seconds: i64,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            code_length: 6,
            ttl_minutes: 10,
            resend_interval_seconds: 60,
        }
    }
}

impl OtpConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            // Codes are stored in a VARCHAR(10) column; anything outside 4..=10 falls back.
            code_length: Some(env_or("OTP_CODE_LENGTH", defaults.code_length))
                .filter(|len| (4..=10).contains(len))
                .unwrap_or(defaults.code_length),
            ttl_minutes: Some(env_or("OTP_TTL_MINUTES", defaults.ttl_minutes))
                .filter(|m| *m > 0)
                .unwrap_or(defaults.ttl_minutes),
            resend_interval_seconds: Some(env_or(
                "OTP_RESEND_INTERVAL_SECONDS",
                defaults.resend_interval_seconds,
            ))
            .filter(|s| *s >= 0)
            .unwrap_or(defaults.resend_interval_seconds),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OtpConfig::default();
        assert_eq!(config.code_length, 6);
        assert_eq!(config.ttl_minutes, 10);
        assert_eq!(config.resend_interval_seconds, 60);
    }

    #[test]
    fn test_from_env_rejects_out_of_range_values() {
        temp_env::with_vars(
            [
                ("OTP_CODE_LENGTH", Some("32")),
                ("OTP_TTL_MINUTES", Some("-5")),
                ("OTP_RESEND_INTERVAL_SECONDS", Some("30")),
            ],
            || {
                let config = OtpConfig::from_env();
                assert_eq!(config.code_length, 6);
                assert_eq!(config.ttl_minutes, 10);
                assert_eq!(config.resend_interval_seconds, 30);
            },
        );
    }

    #[test]
    fn test_code_length_bounded_by_column_width() {
        temp_env::with_var("OTP_CODE_LENGTH", Some("10"), || {
            assert_eq!(OtpConfig::from_env().code_length, 10);
        });
        temp_env::with_var("OTP_CODE_LENGTH", Some("11"), || {
            assert_eq!(OtpConfig::from_env().code_length, 6);
        });
        temp_env::with_var("OTP_CODE_LENGTH", Some("4"), || {
            assert_eq!(OtpConfig::from_env().code_length, 4);
        });
    }
}
