//! Application state and factory
//!
//! This module holds the services shared by every worker and builds the
//! Actix-web application around them.

use actix_web::{web, App, HttpResponse};
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

use vc_core::repositories::{OtpRepository, UserRepository};
use vc_core::services::otp::{OtpIssuer, OtpNotifier, OtpVerifier};
use vc_shared::config::AppConfig;
use vc_shared::types::MessageResponse;

use crate::handlers::json_error_handler;
use crate::middleware::create_cors;
use crate::routes::{health::health_check, otp};

/// Application state that holds shared services
pub struct AppState<R, U, N>
where
    R: OtpRepository,
    U: UserRepository,
    N: OtpNotifier,
{
    pub issuer: OtpIssuer<R, U, N>,
    pub verifier: OtpVerifier<R>,
    /// Store handle used by the health endpoint
    pub store: Arc<R>,
}

impl<R, U, N> AppState<R, U, N>
where
    R: OtpRepository,
    U: UserRepository,
    N: OtpNotifier,
{
    pub fn new(issuer: OtpIssuer<R, U, N>, verifier: OtpVerifier<R>, store: Arc<R>) -> Self {
        Self {
            issuer,
            verifier,
            store,
        }
    }
}

/// Create and configure the application with all dependencies
pub fn create_app<R, U, N>(
    app_state: web::Data<AppState<R, U, N>>,
    config: &AppConfig,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    R: OtpRepository + 'static,
    U: UserRepository + 'static,
    N: OtpNotifier + 'static,
{
    let json_config = web::JsonConfig::default()
        .limit(config.server.max_payload_size)
        .error_handler(json_error_handler);

    App::new()
        .app_data(app_state)
        .app_data(json_config)
        // Last wrap runs first: the request span encloses CORS handling
        .wrap(create_cors(&config.cors, config.environment))
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health_check::<R, U, N>))
        .service(
            web::scope("/api/v1").service(
                web::scope("/otp")
                    .route("/send", web::post().to(otp::send_otp::<R, U, N>))
                    .route("/resend", web::post().to(otp::resend_otp::<R, U, N>))
                    .route("/verify", web::post().to(otp::verify_otp::<R, U, N>)),
            ),
        )
        .default_service(web::route().to(not_found))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(MessageResponse::failure(
        "The requested resource was not found",
    ))
}
