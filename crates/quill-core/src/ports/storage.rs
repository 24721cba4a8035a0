//! File storage port - the hosted upload provider.

use async_trait::async_trait;

/// Remote file store. The backend never handles file bytes, only keys.
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Delete files by their storage keys.
    async fn delete_files(&self, keys: &[String]) -> Result<(), StorageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage request failed: {0}")]
    Request(String),

    #[error("Storage provider rejected the request: {status} {body}")]
    Rejected { status: u16, body: String },
}
