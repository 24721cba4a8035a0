//! # Quill Core
//!
//! The domain layer of the Quill blog backend.
//! Entities, slug and pagination rules, the ports infrastructure must
//! implement, and the guarded services the HTTP layer calls into.

pub mod domain;
pub mod error;
pub mod pagination;
pub mod ports;
pub mod services;
pub mod slug;

pub use error::DomainError;
pub use pagination::{PAGE_SIZE, Page, PageRequest};
pub use slug::generate_slug;
