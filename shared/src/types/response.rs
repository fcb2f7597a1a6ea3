//! API response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minimal `{success, message}` body returned by every OTP endpoint on failure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageResponse {
    /// Whether the request was successful
    pub success: bool,

    /// Human-readable message
    pub message: String,
}

impl MessageResponse {
    /// Create a successful response
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    /// Create a failed response
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Health status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall health status
    pub status: HealthStatus,

    /// Service name
    pub service: String,

    /// Application version
    pub version: String,

    /// Datastore reachability
    pub database: HealthStatus,

    /// Time of the check
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    /// Build a report; the service is healthy only when its datastore is
    pub fn new(service: impl Into<String>, version: impl Into<String>, database_ok: bool) -> Self {
        let status = if database_ok {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy
        };
        Self {
            status,
            service: service.into(),
            version: version.into(),
            database: status,
            timestamp: Utc::now(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}
