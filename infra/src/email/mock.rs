//! Mock email channel for development and testing

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::info;

use vc_shared::utils::email::mask_email;

use super::{EmailChannel, EmailMessage};
use crate::InfrastructureError;

/// Channel that records messages instead of sending them
///
/// Clones share counters, so a test can keep a handle after boxing the
/// channel into a dispatcher.
#[derive(Clone)]
pub struct MockEmailChannel {
    name: String,
    send_count: Arc<AtomicU64>,
    simulate_failure: Arc<AtomicBool>,
    sent: Arc<Mutex<Vec<EmailMessage>>>,
}

impl MockEmailChannel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            send_count: Arc::new(AtomicU64::new(0)),
            simulate_failure: Arc::new(AtomicBool::new(false)),
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A channel that fails every send
    pub fn failing(name: impl Into<String>) -> Self {
        let channel = Self::new(name);
        channel.set_simulate_failure(true);
        channel
    }

    /// Number of send attempts, successful or not
    pub fn get_send_count(&self) -> u64 {
        self.send_count.load(Ordering::SeqCst)
    }

    pub fn set_simulate_failure(&self, simulate: bool) {
        self.simulate_failure.store(simulate, Ordering::SeqCst);
    }

    /// Messages accepted so far
    pub fn sent_messages(&self) -> Vec<EmailMessage> {
        self.sent.lock().map(|m| m.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl EmailChannel for MockEmailChannel {
    async fn send(&self, message: &EmailMessage) -> Result<(), InfrastructureError> {
        self.send_count.fetch_add(1, Ordering::SeqCst);

        if self.simulate_failure.load(Ordering::SeqCst) {
            return Err(InfrastructureError::Email(format!(
                "Simulated {} failure",
                self.name
            )));
        }

        if let Ok(mut sent) = self.sent.lock() {
            sent.push(message.clone());
        }

        info!(
            provider = "mock",
            channel = %self.name,
            email = %mask_email(&message.to),
            "Email recorded (mock)"
        );
        Ok(())
    }

    fn channel_name(&self) -> &str {
        &self.name
    }
}
