//! Business services containing domain logic and use cases.

pub mod otp;

// Re-export commonly used types
pub use otp::{
    Clock, CodeGenerator, IssueOutcome, IssuedOtp, OtpConfig, OtpIssuer, OtpNotifier,
    OtpVerifier, RandomCodeGenerator, SystemClock, VerifyOutcome,
};
