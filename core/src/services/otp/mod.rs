//! Email one-time code service
//!
//! - [`OtpIssuer`] generates and persists codes, enforcing the re-issue
//!   interval, and hands them to an [`OtpNotifier`]
//! - [`OtpVerifier`] checks submitted codes against the current record and
//!   marks the owner verified on success
//! - [`Clock`] and [`CodeGenerator`] are injected so tests can pin time and
//!   codes

mod clock;
mod code;
mod issuer;
mod traits;
mod types;
mod verifier;

#[cfg(test)]
mod tests;

pub use clock::{Clock, ManualClock, SystemClock};
pub use code::{CodeGenerator, FixedCodeGenerator, RandomCodeGenerator};
pub use issuer::OtpIssuer;
pub use traits::OtpNotifier;
pub use types::{IssueOutcome, IssuedOtp, VerifyOutcome};
pub use verifier::OtpVerifier;
pub use vc_shared::config::OtpConfig;
