use actix_web::{web, HttpResponse};

use vc_core::repositories::{OtpRepository, UserRepository};
use vc_core::services::otp::OtpNotifier;
use vc_shared::types::HealthResponse;

use crate::app::AppState;

/// Handler for GET /health
///
/// Reports 200 while the datastore answers and 503 otherwise.
pub async fn health_check<R, U, N>(state: web::Data<AppState<R, U, N>>) -> HttpResponse
where
    R: OtpRepository + 'static,
    U: UserRepository + 'static,
    N: OtpNotifier + 'static,
{
    let database_ok = match state.store.health_check().await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(error = %e, "Datastore health check failed");
            false
        }
    };

    let report = HealthResponse::new("vetclinic-otp", env!("CARGO_PKG_VERSION"), database_ok);
    if report.is_healthy() {
        HttpResponse::Ok().json(report)
    } else {
        HttpResponse::ServiceUnavailable().json(report)
    }
}
