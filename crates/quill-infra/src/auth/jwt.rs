//! JWT session provider.
//!
//! The auth provider signs an HS256 token carrying the session; this side
//! only verifies it. `issue` exists for tests and local tooling.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quill_core::domain::{Role, Session};
use quill_core::ports::{AuthError, SessionProvider};

/// JWT verification configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub expiration_hours: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            issuer: "quill-auth".to_string(),
            expiration_hours: 24,
        }
    }
}

/// Session claims as signed by the auth provider.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String, // user_id
    name: String,
    email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    role: String,
    exp: i64,    // expiration timestamp
    iat: i64,    // issued at
    iss: String, // issuer
}

/// Verifies session tokens signed with a shared secret.
pub struct JwtSessionProvider {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    config: JwtConfig,
}

impl JwtSessionProvider {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            encoding_key,
            decoding_key,
            config,
        }
    }

    /// Sign a token for `session`, valid for the configured lifetime.
    pub fn issue(&self, session: &Session) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now + TimeDelta::hours(self.config.expiration_hours);

        let claims = Claims {
            sub: session.user_id.to_string(),
            name: session.name.clone(),
            email: session.email.clone(),
            image: session.image.clone(),
            role: session.role.as_str().to_string(),
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }
}

impl SessionProvider for JwtSessionProvider {
    fn resolve(&self, token: &str) -> Result<Session, AuthError> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::SessionExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            }
        })?;
        let claims = token_data.claims;

        let user_id =
            Uuid::parse_str(&claims.sub).map_err(|e| AuthError::InvalidToken(e.to_string()))?;
        let role: Role = claims
            .role
            .parse()
            .map_err(|_| AuthError::InvalidToken(format!("unknown role '{}'", claims.role)))?;

        Ok(Session {
            user_id,
            name: claims.name,
            email: claims.email,
            image: claims.image,
            role,
        })
    }
}
