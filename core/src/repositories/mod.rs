pub mod memory;
pub mod otp;
pub mod user;

pub use memory::{InMemoryOtpRepository, InMemoryUserRepository};
pub use otp::{IssuedRecord, OtpOwner, OtpRepository};
pub use user::UserRepository;
