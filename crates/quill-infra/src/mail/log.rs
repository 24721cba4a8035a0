use async_trait::async_trait;

use quill_core::ports::{EmailMessage, MailError, Mailer};

/// Mailer that only logs what it would have sent.
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn deliver(&self, message: &EmailMessage) -> Result<(), MailError> {
        tracing::info!(
            to = %message.to,
            subject = %message.full_subject(),
            link = %message.link,
            "SMTP not configured, email logged instead of sent"
        );
        Ok(())
    }
}
