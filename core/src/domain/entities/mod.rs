//! Domain entities representing core business objects.

pub mod otp_record;
pub mod user;

// Re-export commonly used types
pub use otp_record::{NewOtpRecord, OtpRecord};
pub use user::{NewUser, User, UserRole};
