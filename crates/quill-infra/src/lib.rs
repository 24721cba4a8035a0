//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//! This crate contains the database, session verification, mail, file
//! storage and rate limiting integrations.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory store and log-only mailer
//! - `postgres` - PostgreSQL database support via SeaORM
//! - `rate-limit` - Rate limiting via governor
//! - `smtp` - SMTP mail delivery via lettre

pub mod auth;
pub mod database;
pub mod mail;
pub mod storage;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;

pub use auth::{JwtConfig, JwtSessionProvider};
pub use database::{DatabaseConfig, InMemoryStore};
pub use mail::{LogMailer, SmtpConfig};
pub use storage::{InMemoryFileStorage, UploadThingConfig, UploadThingStorage};

#[cfg(feature = "postgres")]
pub use database::DatabaseConnections;

#[cfg(feature = "smtp")]
pub use mail::SmtpMailer;

#[cfg(feature = "rate-limit")]
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};
