use actix_web::{web, HttpResponse};
use validator::Validate;

use vc_core::repositories::{OtpRepository, UserRepository};
use vc_core::services::otp::{OtpNotifier, VerifyOutcome};
use vc_shared::types::MessageResponse;

use crate::app::AppState;
use crate::dto::VerifyOtpRequest;
use crate::handlers::{domain_error_response, validation_error_response};

/// Handler for POST /api/v1/otp/verify
///
/// # Request Body
///
/// ```json
/// { "email": "owner@example.com", "otp": "123456" }
/// ```
///
/// # Responses
///
/// - 200 verified
/// - 400 malformed input, wrong code, expired code or code already used
/// - 404 no code was issued for the address
/// - 500 the verification could not be committed
pub async fn verify_otp<R, U, N>(
    state: web::Data<AppState<R, U, N>>,
    request: web::Json<VerifyOtpRequest>,
) -> HttpResponse
where
    R: OtpRepository + 'static,
    U: UserRepository + 'static,
    N: OtpNotifier + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_error_response(&errors);
    }

    let outcome = match state.verifier.verify_otp(&request.email, &request.otp).await {
        Ok(outcome) => outcome,
        Err(error) => return domain_error_response(&error),
    };

    match outcome {
        VerifyOutcome::Verified { .. } => {
            HttpResponse::Ok().json(MessageResponse::ok("Email verified successfully"))
        }
        VerifyOutcome::Mismatch { .. } => {
            HttpResponse::BadRequest().json(MessageResponse::failure("Invalid verification code"))
        }
        VerifyOutcome::Expired => HttpResponse::BadRequest().json(MessageResponse::failure(
            "Verification code has expired. Please request a new one.",
        )),
        VerifyOutcome::AlreadyUsed => HttpResponse::BadRequest().json(MessageResponse::failure(
            "Verification code has already been used",
        )),
        VerifyOutcome::NotFound => HttpResponse::NotFound().json(MessageResponse::failure(
            "No verification code found for this email address",
        )),
    }
}
