//! # VetClinic Core
//!
//! Core business logic and domain layer for the VetClinic OTP verification
//! service. This crate contains the domain entities, the OTP issuer and
//! verifier, repository interfaces with in-memory implementations, and the
//! error types the infrastructure and API layers build on.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{NewOtpRecord, NewUser, OtpRecord, User, UserRole};
pub use errors::{DomainError, DomainResult};
pub use repositories::{
    InMemoryOtpRepository, InMemoryUserRepository, IssuedRecord, OtpOwner, OtpRepository,
    UserRepository,
};
pub use services::otp::{
    Clock, CodeGenerator, IssueOutcome, IssuedOtp, OtpConfig, OtpIssuer, OtpNotifier,
    OtpVerifier, RandomCodeGenerator, SystemClock, VerifyOutcome,
};
