//! Request and response bodies

pub mod otp;

pub use otp::{ResendOtpRequest, SendOtpRequest, SendOtpResponse, VerifyOtpRequest};
pub use vc_shared::types::MessageResponse;
