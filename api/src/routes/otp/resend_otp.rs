use actix_web::{web, HttpResponse};
use validator::Validate;

use vc_core::repositories::{OtpRepository, UserRepository};
use vc_core::services::otp::OtpNotifier;

use crate::app::AppState;
use crate::dto::ResendOtpRequest;
use crate::handlers::{domain_error_response, validation_error_response};

use super::issue_outcome_response;

/// Handler for POST /api/v1/otp/resend
///
/// Same responses as `send`, plus 404 when no account uses the address.
pub async fn resend_otp<R, U, N>(
    state: web::Data<AppState<R, U, N>>,
    request: web::Json<ResendOtpRequest>,
) -> HttpResponse
where
    R: OtpRepository + 'static,
    U: UserRepository + 'static,
    N: OtpNotifier + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    match state.issuer.resend_otp(&request.email).await {
        Ok(outcome) => issue_outcome_response(outcome),
        Err(error) => domain_error_response(&error),
    }
}
