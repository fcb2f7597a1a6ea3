//! Tests for ordered delivery and fallthrough

use vc_core::services::otp::OtpNotifier;

use crate::email::{
    EmailChannel, MockEmailChannel, NotificationDispatcher, OtpEmailTemplate,
};

fn dispatcher(channels: &[&MockEmailChannel]) -> NotificationDispatcher {
    let boxed: Vec<Box<dyn EmailChannel>> = channels
        .iter()
        .map(|c| Box::new((*c).clone()) as Box<dyn EmailChannel>)
        .collect();
    NotificationDispatcher::new(boxed, OtpEmailTemplate::new("VetClinic", 10))
}

#[tokio::test]
async fn test_first_channel_success_skips_the_rest() {
    let brevo = MockEmailChannel::new("brevo");
    let smtp = MockEmailChannel::new("smtp");
    let sendmail = MockEmailChannel::new("sendmail");
    let dispatcher = dispatcher(&[&brevo, &smtp, &sendmail]);

    let report = dispatcher.dispatch("pet@owner.example", "123456").await;

    assert_eq!(report.delivered_by.as_deref(), Some("brevo"));
    assert!(report.failures.is_empty());
    assert_eq!(brevo.get_send_count(), 1);
    assert_eq!(smtp.get_send_count(), 0);
    assert_eq!(sendmail.get_send_count(), 0);

    let sent = brevo.sent_messages();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "pet@owner.example");
    assert!(sent[0].text_body.contains("123456"));
}

#[tokio::test]
async fn test_falls_through_in_order() {
    let brevo = MockEmailChannel::failing("brevo");
    let smtp = MockEmailChannel::failing("smtp");
    let sendmail = MockEmailChannel::new("sendmail");
    let dispatcher = dispatcher(&[&brevo, &smtp, &sendmail]);

    let report = dispatcher.dispatch("pet@owner.example", "123456").await;

    assert!(report.is_delivered());
    assert_eq!(report.delivered_by.as_deref(), Some("sendmail"));
    let failed: Vec<&str> = report.failures.iter().map(|f| f.channel.as_str()).collect();
    assert_eq!(failed, vec!["brevo", "smtp"]);
    assert_eq!(brevo.get_send_count(), 1);
    assert_eq!(smtp.get_send_count(), 1);
    assert_eq!(sendmail.get_send_count(), 1);
}

#[tokio::test]
async fn test_all_channels_failing_returns_false() {
    let brevo = MockEmailChannel::failing("brevo");
    let smtp = MockEmailChannel::failing("smtp");
    let dispatcher = dispatcher(&[&brevo, &smtp]);

    assert!(!dispatcher.send_otp_email("pet@owner.example", "123456").await);
    assert_eq!(brevo.get_send_count(), 1);
    assert_eq!(smtp.get_send_count(), 1);
}

#[tokio::test]
async fn test_no_channels_returns_false() {
    let dispatcher = dispatcher(&[]);

    let report = dispatcher.dispatch("pet@owner.example", "123456").await;
    assert!(!report.is_delivered());
    assert!(report.failures.is_empty());
    assert!(!dispatcher.send_otp_email("pet@owner.example", "123456").await);
}

#[tokio::test]
async fn test_recovered_channel_used_on_next_dispatch() {
    let brevo = MockEmailChannel::failing("brevo");
    let smtp = MockEmailChannel::new("smtp");
    let dispatcher = dispatcher(&[&brevo, &smtp]);

    assert!(dispatcher.send_otp_email("a@vet.example", "111111").await);
    brevo.set_simulate_failure(false);
    let report = dispatcher.dispatch("a@vet.example", "222222").await;

    assert_eq!(report.delivered_by.as_deref(), Some("brevo"));
    assert_eq!(brevo.get_send_count(), 2);
    assert_eq!(smtp.get_send_count(), 1);
}
