//! Tests for building the channel chain from configuration

use vc_shared::config::{BrevoConfig, EmailConfig, SendmailConfig, SmtpConfig, SmtpEncryption};

use crate::email::create_dispatcher;

fn smtp() -> SmtpConfig {
    SmtpConfig {
        host: "smtp.example.com".to_string(),
        port: 587,
        username: "clinic".to_string(),
        password: "secret".to_string(),
        encryption: SmtpEncryption::StartTls,
        timeout_seconds: 10,
    }
}

fn brevo() -> BrevoConfig {
    BrevoConfig {
        api_key: "xkeysib-test".to_string(),
        api_url: "http://localhost:9/v3/smtp/email".to_string(),
        timeout_seconds: 10,
    }
}

#[tokio::test]
async fn test_full_chain_in_priority_order() {
    let config = EmailConfig {
        brevo: Some(brevo()),
        smtp: Some(smtp()),
        ..EmailConfig::default()
    };

    let dispatcher = create_dispatcher(&config, 10);
    assert_eq!(dispatcher.channel_names(), vec!["brevo", "smtp", "sendmail"]);
}

#[tokio::test]
async fn test_unconfigured_channels_are_left_out() {
    let config = EmailConfig {
        smtp: Some(smtp()),
        ..EmailConfig::default()
    };

    let dispatcher = create_dispatcher(&config, 10);
    assert_eq!(dispatcher.channel_names(), vec!["smtp", "sendmail"]);
}

#[tokio::test]
async fn test_nothing_configured() {
    let config = EmailConfig {
        sendmail: SendmailConfig {
            enabled: false,
            command: None,
        },
        ..EmailConfig::default()
    };

    let dispatcher = create_dispatcher(&config, 10);
    assert!(dispatcher.channel_names().is_empty());
}

#[tokio::test]
async fn test_invalid_brevo_settings_skip_the_channel() {
    let config = EmailConfig {
        brevo: Some(BrevoConfig {
            api_key: String::new(),
            ..brevo()
        }),
        ..EmailConfig::default()
    };

    let dispatcher = create_dispatcher(&config, 10);
    assert_eq!(dispatcher.channel_names(), vec!["sendmail"]);
}
