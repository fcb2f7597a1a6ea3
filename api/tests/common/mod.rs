//! Shared wiring for the endpoint tests
#![allow(dead_code)]

use actix_web::web;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::Arc;

use vc_api::AppState;
use vc_core::repositories::{InMemoryOtpRepository, InMemoryUserRepository};
use vc_core::services::otp::{FixedCodeGenerator, ManualClock, OtpConfig, OtpIssuer, OtpVerifier};
use vc_infra::email::{EmailChannel, MockEmailChannel, NotificationDispatcher, OtpEmailTemplate};
use vc_shared::config::AppConfig;

pub type TestState = AppState<InMemoryOtpRepository, InMemoryUserRepository, NotificationDispatcher>;

pub const CODE: &str = "123456";

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 20, 8, 30, 0).unwrap()
}

/// In-memory store, manual clock and a mock email channel behind the real
/// dispatcher. Every issued code is [`CODE`].
pub struct TestContext {
    pub store: Arc<InMemoryOtpRepository>,
    pub clock: Arc<ManualClock>,
    pub channel: MockEmailChannel,
    pub state: web::Data<TestState>,
    pub config: AppConfig,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_channel(MockEmailChannel::new("brevo"))
    }

    /// Every delivery attempt fails
    pub fn with_failing_email() -> Self {
        Self::with_channel(MockEmailChannel::failing("brevo"))
    }

    fn with_channel(channel: MockEmailChannel) -> Self {
        let config = AppConfig::default();
        let store = Arc::new(InMemoryOtpRepository::new());
        let users = Arc::new(store.user_repository());
        let clock = Arc::new(ManualClock::new(start_time()));

        let dispatcher = NotificationDispatcher::new(
            vec![Box::new(channel.clone()) as Box<dyn EmailChannel>],
            OtpEmailTemplate::new("VetClinic", config.otp.ttl_minutes),
        );

        let issuer = OtpIssuer::new(
            store.clone(),
            users,
            Arc::new(dispatcher),
            OtpConfig::default(),
        )
        .with_clock(clock.clone())
        .with_code_generator(Arc::new(FixedCodeGenerator::new(CODE)));
        let verifier =
            OtpVerifier::new(store.clone(), OtpConfig::default()).with_clock(clock.clone());

        let state = web::Data::new(AppState::new(issuer, verifier, store.clone()));

        Self {
            store,
            clock,
            channel,
            state,
            config,
        }
    }
}
