//! Outbound email, used by the auth provider's verification and reset flows.

use std::sync::Arc;

use crate::ports::{EmailMessage, Mailer};

pub struct NotificationService {
    mailer: Arc<dyn Mailer>,
}

impl NotificationService {
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self { mailer }
    }

    /// Fire-and-forget delivery. Failures are logged, never retried.
    pub async fn send(&self, message: &EmailMessage) -> bool {
        match self.mailer.deliver(message).await {
            Ok(()) => {
                tracing::info!(subject = %message.subject, "Email sent");
                true
            }
            Err(err) => {
                tracing::error!(subject = %message.subject, error = %err, "Email delivery failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::ports::MailError;

    struct FailingMailer;

    #[async_trait]
    impl Mailer for FailingMailer {
        async fn deliver(&self, _message: &EmailMessage) -> Result<(), MailError> {
            Err(MailError::Transport("connection refused".into()))
        }
    }

    struct AcceptingMailer;

    #[async_trait]
    impl Mailer for AcceptingMailer {
        async fn deliver(&self, _message: &EmailMessage) -> Result<(), MailError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn reports_delivery_outcome_as_bool() {
        let message = EmailMessage::verify_email("a@example.com", "https://x.test/verify");

        assert!(NotificationService::new(Arc::new(AcceptingMailer)).send(&message).await);
        assert!(!NotificationService::new(Arc::new(FailingMailer)).send(&message).await);
    }
}
