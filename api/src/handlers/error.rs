//! Mapping of failures onto `{success: false, message}` responses
//!
//! Client-facing messages are short and non-technical. Store and transport
//! detail is logged here and never reaches the response body.

use actix_web::{error::JsonPayloadError, HttpRequest, HttpResponse};
use validator::ValidationErrors;

use vc_core::errors::DomainError;
use vc_shared::types::MessageResponse;

const INTERNAL_ERROR_MESSAGE: &str = "Something went wrong. Please try again later.";

/// Convert a domain error into an HTTP response
pub fn domain_error_response(error: &DomainError) -> HttpResponse {
    match error {
        DomainError::Validation { message } => {
            HttpResponse::BadRequest().json(MessageResponse::failure(message.clone()))
        }
        DomainError::NotFound { resource } => {
            let message = if resource == "User" {
                "No account found for this email address".to_string()
            } else {
                format!("{} not found", resource)
            };
            HttpResponse::NotFound().json(MessageResponse::failure(message))
        }
        DomainError::Database { .. } | DomainError::Internal { .. } => {
            tracing::error!(error = %error, "Request failed with internal error");
            HttpResponse::InternalServerError().json(MessageResponse::failure(INTERNAL_ERROR_MESSAGE))
        }
    }
}

/// 400 response carrying the first field error's message
pub fn validation_error_response(errors: &ValidationErrors) -> HttpResponse {
    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.iter().collect();
    fields.sort_by_key(|(field, _)| **field);

    let message = fields
        .first()
        .and_then(|(field, errors)| {
            errors.first().map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid {}", field))
            })
        })
        .unwrap_or_else(|| "Invalid request".to_string());

    HttpResponse::BadRequest().json(MessageResponse::failure(message))
}

/// Turn unreadable JSON bodies into the standard 400 body
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(error = %err, "Rejected request body");
    let message = match &err {
        JsonPayloadError::ContentType => "Content-Type must be application/json",
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            "Request body is too large"
        }
        _ => "Invalid request body",
    };
    let response = HttpResponse::BadRequest().json(MessageResponse::failure(message));
    actix_web::error::InternalError::from_response(err, response).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_status_mapping() {
        let validation = DomainError::Validation {
            message: "Email is required".to_string(),
        };
        assert_eq!(domain_error_response(&validation).status(), StatusCode::BAD_REQUEST);

        let not_found = DomainError::NotFound {
            resource: "User".to_string(),
        };
        assert_eq!(domain_error_response(&not_found).status(), StatusCode::NOT_FOUND);

        let database = DomainError::Database {
            message: "Lost connection to MySQL server".to_string(),
        };
        assert_eq!(
            domain_error_response(&database).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
