//! One-time code endpoints
//!
//! - `POST /api/v1/otp/send`: issue a code, creating the account if needed
//! - `POST /api/v1/otp/resend`: issue a new code for an existing account
//! - `POST /api/v1/otp/verify`: check a submitted code

pub mod resend_otp;
pub mod send_otp;
pub mod verify_otp;

pub use resend_otp::resend_otp;
pub use send_otp::send_otp;
pub use verify_otp::verify_otp;

use actix_web::{http::header, HttpResponse};

use vc_core::services::otp::IssueOutcome;
use vc_shared::types::MessageResponse;

use crate::dto::SendOtpResponse;

/// Shared response for the two issuance endpoints
pub(crate) fn issue_outcome_response(outcome: IssueOutcome) -> HttpResponse {
    match outcome {
        IssueOutcome::Issued(issued) => {
            let message = if issued.email_sent {
                "Verification code sent. Please check your email."
            } else {
                "Verification code created, but the email could not be delivered. Please request a new code shortly."
            };
            let resend_after = (issued.next_issue_at - issued.record.created_at).num_seconds();

            HttpResponse::Ok().json(SendOtpResponse {
                success: true,
                message: message.to_string(),
                email_sent: issued.email_sent,
                resend_after,
            })
        }
        IssueOutcome::RateLimited {
            retry_after_seconds,
        } => HttpResponse::TooManyRequests()
            .insert_header((header::RETRY_AFTER, retry_after_seconds.to_string()))
            .json(MessageResponse::failure(format!(
                "Please wait {} seconds before requesting a new code",
                retry_after_seconds
            ))),
    }
}
