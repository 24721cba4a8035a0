//! Email port and the single message template the site sends.

use async_trait::async_trait;

const SUBJECT_PREFIX: &str = "Blog - ";

/// A templated email: heading, one paragraph and a call-to-action link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub description: String,
    pub link: String,
}

impl EmailMessage {
    pub fn new(
        to: impl Into<String>,
        subject: impl Into<String>,
        description: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            description: description.into(),
            link: link.into(),
        }
    }

    pub fn verify_email(to: impl Into<String>, link: impl Into<String>) -> Self {
        Self::new(
            to,
            "Verify Your Email Address",
            "Please verify your email address to complete registration.",
            link,
        )
    }

    pub fn reset_password(to: impl Into<String>, link: impl Into<String>) -> Self {
        Self::new(
            to,
            "Reset your password",
            "Please click the link below to reset your password.",
            link,
        )
    }

    /// Subject line as it appears in the inbox.
    pub fn full_subject(&self) -> String {
        format!("{SUBJECT_PREFIX}{}", self.subject)
    }

    pub fn render_html(&self) -> String {
        format!(
            r#"<div style="max-width:500px;margin:20px auto;padding:20px;border:1px solid #DDD;border-radius:6px;">
    <h1 style="font-size:20px;color:#333;">{subject}</h1>
    <p style="font-size:16px;">{description}</p>
    <a href="{link}" style="display:inline-block;margin-top:15px;padding:10px 15px;background:#007BFF;color:#FFF;text-decoration:none;border-radius:4px;">Click here</a>
</div>"#,
            subject = escape_html(&self.subject),
            description = escape_html(&self.description),
            link = escape_html(&self.link),
        )
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Outbound mail transport.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn deliver(&self, message: &EmailMessage) -> Result<(), MailError>;
}

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Invalid address: {0}")]
    Address(String),

    #[error("Transport failed: {0}")]
    Transport(String),
}
