//! Session verification.

mod jwt;

pub use jwt::{JwtConfig, JwtSessionProvider};
