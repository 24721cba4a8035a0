//! SeaORM entities for the blog tables.

pub mod category;
pub mod post;
pub mod post_relation;
pub mod upload;
pub mod user;
