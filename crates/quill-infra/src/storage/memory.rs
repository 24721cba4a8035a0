use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;

use quill_core::ports::{FileStorage, StorageError};

/// Storage stand-in that tracks which keys were deleted.
///
/// Keys listed in `failing` are rejected, for exercising provider errors.
#[derive(Default)]
pub struct InMemoryFileStorage {
    deleted: RwLock<Vec<String>>,
    failing: HashSet<String>,
}

impl InMemoryFileStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(keys: impl IntoIterator<Item = String>) -> Self {
        Self {
            deleted: RwLock::default(),
            failing: keys.into_iter().collect(),
        }
    }

    pub async fn deleted(&self) -> Vec<String> {
        self.deleted.read().await.clone()
    }
}

#[async_trait]
impl FileStorage for InMemoryFileStorage {
    async fn delete_files(&self, keys: &[String]) -> Result<(), StorageError> {
        if let Some(key) = keys.iter().find(|k| self.failing.contains(*k)) {
            return Err(StorageError::Rejected {
                status: 500,
                body: format!("cannot delete {key}"),
            });
        }
        self.deleted.write().await.extend_from_slice(keys);
        Ok(())
    }
}
