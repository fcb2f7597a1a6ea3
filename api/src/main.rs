use actix_web::{web, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use tracing::info;

use vc_api::{config, create_app, telemetry, AppState};
use vc_core::services::otp::{OtpIssuer, OtpVerifier};
use vc_infra::database::{DatabasePool, MySqlOtpRepository, MySqlUserRepository};
use vc_infra::email::create_dispatcher;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = config::load();
    telemetry::init_tracing(&config.logging);

    info!(
        environment = %config.environment,
        version = env!("CARGO_PKG_VERSION"),
        "Starting VetClinic OTP service"
    );

    let pool = DatabasePool::new(&config.database)
        .await
        .context("Failed to connect to database")?;

    let otps = Arc::new(MySqlOtpRepository::new(pool.get_pool().clone()));
    let users = Arc::new(MySqlUserRepository::new(pool.get_pool().clone()));
    let dispatcher = Arc::new(create_dispatcher(&config.email, config.otp.ttl_minutes));

    let issuer = OtpIssuer::new(otps.clone(), users, dispatcher, config.otp.clone());
    let verifier = OtpVerifier::new(otps.clone(), config.otp.clone());
    let state = web::Data::new(AppState::new(issuer, verifier, otps));

    let bind_address = config.server.bind_address();
    info!(address = %bind_address, "Server will bind");

    let app_config = config.clone();
    let mut server = HttpServer::new(move || create_app(state.clone(), &app_config));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await
        .context("HTTP server error")?;

    info!("Server stopped, closing database pool");
    pool.close().await;
    Ok(())
}
