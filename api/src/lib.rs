//! HTTP API for the VetClinic email OTP service
//!
//! Exposes issuance, resend and verification endpoints over JSON and maps
//! domain outcomes onto HTTP status codes. Library exports exist so the
//! endpoint tests can build the application in-process.

pub mod app;
pub mod config;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod telemetry;

pub use app::{create_app, AppState};
