use actix_web::{web, HttpResponse};
use validator::Validate;

use vc_core::repositories::{OtpRepository, UserRepository};
use vc_core::services::otp::OtpNotifier;
use vc_shared::utils::email::mask_email;

use crate::app::AppState;
use crate::dto::SendOtpRequest;
use crate::handlers::{domain_error_response, validation_error_response};

use super::issue_outcome_response;

/// Handler for POST /api/v1/otp/send
///
/// # Request Body
///
/// ```json
/// { "email": "owner@example.com", "name": "Jane" }
/// ```
///
/// # Responses
///
/// - 200 `{success, message, email_sent, resend_after}`; `email_sent` is
///   false when every channel failed, the code remains valid
/// - 400 malformed email
/// - 429 a code was issued too recently (`Retry-After` header set)
/// - 500 storage failure
pub async fn send_otp<R, U, N>(
    state: web::Data<AppState<R, U, N>>,
    request: web::Json<SendOtpRequest>,
) -> HttpResponse
where
    R: OtpRepository + 'static,
    U: UserRepository + 'static,
    N: OtpNotifier + 'static,
{
    if let Err(errors) = request.validate() {
        tracing::debug!(email = %mask_email(&request.email), "Rejected send request");
        return validation_error_response(&errors);
    }

    let name = request
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());

    match state.issuer.issue_otp(&request.email, name).await {
        Ok(outcome) => issue_outcome_response(outcome),
        Err(error) => domain_error_response(&error),
    }
}
