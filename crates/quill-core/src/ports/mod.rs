//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod mailer;
mod rate_limit;
mod repository;
mod storage;

pub use auth::{AuthError, SessionProvider};
pub use mailer::{EmailMessage, MailError, Mailer};
pub use rate_limit::{RateLimitError, RateLimitResult, RateLimiter};
pub use repository::{
    BaseRepository, CategoryRepository, PostRepository, SearchRepository, UploadRepository,
    UserRepository,
};
pub use storage::{FileStorage, StorageError};
