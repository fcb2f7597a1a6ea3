//! CORS configuration for the clinic web portal.
//!
//! With no configured origins every origin is allowed, which is only
//! acceptable in development. In production the configured origins are the
//! complete allow list.

use actix_cors::Cors;
use actix_web::http::{header, Method};

use vc_shared::config::{CorsConfig, Environment};

/// Creates a CORS middleware instance for the given configuration.
pub fn create_cors(config: &CorsConfig, environment: Environment) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::ORIGIN,
            header::HeaderName::from_static("x-requested-with"),
        ])
        .expose_headers(vec![
            header::RETRY_AFTER,
            header::HeaderName::from_static("x-request-id"),
        ])
        .max_age(config.max_age);

    if config.allowed_origins.is_empty() {
        if environment.is_production() {
            tracing::warn!("No CORS origins configured in production; cross-origin requests will be rejected");
            return cors;
        }
        return cors.allow_any_origin();
    }

    config
        .allowed_origins
        .iter()
        .map(|origin| origin.trim())
        .filter(|origin| !origin.is_empty())
        .fold(cors, |cors, origin| {
            tracing::info!(origin = %origin, "Adding allowed origin");
            cors.allowed_origin(origin)
        })
}
