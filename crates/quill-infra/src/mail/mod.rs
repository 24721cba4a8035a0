//! Mailer implementations.

mod log;
#[cfg(feature = "smtp")]
mod smtp;

pub use log::LogMailer;
#[cfg(feature = "smtp")]
pub use smtp::SmtpMailer;

/// SMTP relay configuration.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}
