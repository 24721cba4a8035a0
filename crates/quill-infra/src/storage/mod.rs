//! File storage providers. Only deletion passes through the backend;
//! uploads go from the browser straight to the provider.

mod memory;
mod uploadthing;

pub use memory::InMemoryFileStorage;
pub use uploadthing::{UploadThingConfig, UploadThingStorage};
