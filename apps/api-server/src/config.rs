//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use quill_infra::{DatabaseConfig, JwtConfig, SmtpConfig, UploadThingConfig};

const DEFAULT_JWT_SECRET: &str = "change-me-in-production";
const DEFAULT_UPLOADTHING_URL: &str = "https://api.uploadthing.com";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub run_migrations: bool,
    pub jwt: JwtConfig,
    pub smtp: Option<SmtpConfig>,
    pub uploadthing: Option<UploadThingConfig>,
    pub hook_secret: Option<String>,
    pub rate_limit_max_requests: u32,
    pub rate_limit_window: Duration,
}

/// Parse `key`, falling back to `default` when unset or malformed.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Non-empty value of `key`.
fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env_opt("DATABASE_URL").map(|url| DatabaseConfig {
            url,
            max_connections: env_or("DB_MAX_CONNECTIONS", 20),
            min_connections: env_or("DB_MIN_CONNECTIONS", 2),
        });

        let smtp = match (env_opt("SMTP_HOST"), env_opt("MAIL_FROM")) {
            (Some(host), Some(from)) => Some(SmtpConfig {
                host,
                port: env_or("SMTP_PORT", 465),
                username: env::var("SMTP_USER").unwrap_or_default(),
                password: env::var("SMTP_PASSWORD").unwrap_or_default(),
                from,
            }),
            _ => None,
        };

        let uploadthing = env_opt("UPLOADTHING_TOKEN").map(|api_key| UploadThingConfig {
            api_key,
            api_url: env_opt("UPLOADTHING_API_URL")
                .unwrap_or_else(|| DEFAULT_UPLOADTHING_URL.to_string()),
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env_or("PORT", 8080),
            database,
            run_migrations: env::var("RUN_MIGRATIONS")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            jwt: Self::jwt_from_env(),
            smtp,
            uploadthing,
            hook_secret: env_opt("HOOK_SECRET"),
            rate_limit_max_requests: env_or("RATE_LIMIT_MAX_REQUESTS", 100),
            rate_limit_window: Duration::from_secs(env_or("RATE_LIMIT_WINDOW_SECS", 60)),
        }
    }

    fn jwt_from_env() -> JwtConfig {
        let secret = env_opt("AUTH_JWT_SECRET").unwrap_or_else(|| DEFAULT_JWT_SECRET.to_string());

        // Warn if using default secret in production
        if secret == DEFAULT_JWT_SECRET {
            let is_production = env::var("RUST_ENV")
                .map(|v| v == "production" || v == "prod")
                .unwrap_or(false);

            if is_production {
                tracing::error!(
                    "SECURITY: Using default session secret in production! Set AUTH_JWT_SECRET."
                );
            } else {
                tracing::warn!("Using default session secret. Set AUTH_JWT_SECRET for production use.");
            }
        }

        JwtConfig {
            secret,
            issuer: env::var("AUTH_JWT_ISSUER").unwrap_or_else(|_| "quill-auth".to_string()),
            ..JwtConfig::default()
        }
    }
}
