use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use vc_shared::utils::email::{is_valid_email, normalize_email};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendOtpRequest {
    /// Address to verify; trimmed and lower-cased before use
    #[validate(custom = "validate_email_address")]
    pub email: String,

    /// Display name for an account created by this request
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResendOtpRequest {
    #[validate(custom = "validate_email_address")]
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    #[validate(custom = "validate_email_address")]
    pub email: String,

    /// Code as received by email
    #[validate(length(min = 1, max = 16, message = "Verification code is required"))]
    pub otp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendOtpResponse {
    pub success: bool,
    pub message: String,
    /// Whether any delivery channel accepted the email
    pub email_sent: bool,
    /// Seconds until another code may be requested
    pub resend_after: i64,
}

fn validate_email_address(email: &str) -> Result<(), ValidationError> {
    if is_valid_email(&normalize_email(email)) {
        return Ok(());
    }
    let mut error = ValidationError::new("email");
    error.message = Some("Please provide a valid email address".into());
    Err(error)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_request_validation() {
        let valid = SendOtpRequest {
            email: "  Owner@Example.com ".to_string(),
            name: Some("Rex's owner".to_string()),
        };
        assert!(valid.validate().is_ok());

        let invalid = SendOtpRequest {
            email: "owner.example.com".to_string(),
            name: None,
        };
        let errors = invalid.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_malformed_local_parts_are_rejected() {
        let long_local = format!("{}@x.io", "a".repeat(65));
        for email in ["a,b@x.io", "a@.x.io", "a..b@x.io", "(x)@x.io", long_local.as_str()] {
            let request = ResendOtpRequest {
                email: email.to_string(),
            };
            let errors = request.validate().unwrap_err();
            assert!(errors.field_errors().contains_key("email"), "{}", email);
        }
    }

    #[test]
    fn test_name_length_limit() {
        let request = SendOtpRequest {
            email: "owner@example.com".to_string(),
            name: Some("x".repeat(101)),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_verify_request_requires_code() {
        let request = VerifyOtpRequest {
            email: "owner@example.com".to_string(),
            otp: String::new(),
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("otp"));
    }

    #[test]
    fn test_name_is_optional_in_json() {
        let request: SendOtpRequest =
            serde_json::from_str(r#"{"email":"owner@example.com"}"#).unwrap();
        assert!(request.name.is_none());
    }
}
