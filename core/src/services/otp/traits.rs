//! Delivery seam between the issuer and the email channels

use async_trait::async_trait;

/// Delivers a freshly issued code to its recipient
#[async_trait]
pub trait OtpNotifier: Send + Sync {
    /// Attempt delivery once. Returns `true` if any channel accepted the
    /// message; never fails.
    async fn send_otp_email(&self, email: &str, code: &str) -> bool;
}
