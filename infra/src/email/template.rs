//! Verification email content

/// A rendered message ready for any channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

/// Renders the verification email for a code
#[derive(Debug, Clone)]
pub struct OtpEmailTemplate {
    clinic_name: String,
    ttl_minutes: i64,
}

impl OtpEmailTemplate {
    pub fn new(clinic_name: impl Into<String>, ttl_minutes: i64) -> Self {
        Self {
            clinic_name: clinic_name.into(),
            ttl_minutes,
        }
    }

    pub fn render(&self, to: &str, code: &str) -> EmailMessage {
        let clinic = &self.clinic_name;
        let minutes = self.ttl_minutes;

        let subject = format!("{} verification code", clinic);

        let text_body = format!(
            "Hello,\n\n\
             Your {clinic} verification code is: {code}\n\n\
             The code expires in {minutes} minutes. If you did not request it, \
             you can ignore this email.\n\n\
             {clinic}\n"
        );

        let html_body = format!(
            r#"<!DOCTYPE html>
<html>
  <body style="font-family: Arial, sans-serif; color: #333333;">
    <h2 style="color: #2a7ab0;">{clinic}</h2>
    <p>Hello,</p>
    <p>Your verification code is:</p>
    <p style="font-size: 28px; font-weight: bold; letter-spacing: 6px;">{code}</p>
    <p>The code expires in {minutes} minutes. If you did not request it, you can ignore this email.</p>
  </body>
</html>
"#,
            clinic = escape_html(clinic),
        );

        EmailMessage {
            to: to.to_string(),
            subject,
            html_body,
            text_body,
        }
    }
}

fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
