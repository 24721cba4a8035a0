//! Authentication port - session lookup delegated to the auth provider.

use crate::domain::Session;

/// Resolves a bearer credential into a verified session.
///
/// Credential checks, session issuance and role assignment all live in the
/// auth provider; this is the only question the backend ever asks it.
pub trait SessionProvider: Send + Sync {
    fn resolve(&self, token: &str) -> Result<Session, AuthError>;
}

/// Authentication errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Session expired")]
    SessionExpired,

    #[error("Invalid session token: {0}")]
    InvalidToken(String),

    #[error("Missing authorization header")]
    MissingAuth,
}
