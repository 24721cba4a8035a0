//! Upload metadata management. File bytes live with the upload provider.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{NewUpload, Session, Upload};
use crate::error::{DomainError, RepoError};
use crate::ports::{FileStorage, UploadRepository};

pub struct UploadService {
    uploads: Arc<dyn UploadRepository>,
    storage: Arc<dyn FileStorage>,
}

impl UploadService {
    pub fn new(uploads: Arc<dyn UploadRepository>, storage: Arc<dyn FileStorage>) -> Self {
        Self { uploads, storage }
    }

    /// Persist metadata for a file the provider already stored.
    pub async fn record(&self, session: &Session, upload: NewUpload) -> Result<Upload, DomainError> {
        let upload = upload.validate()?;
        let upload = self.uploads.insert(upload).await?;

        tracing::info!(upload_id = %upload.id, file_key = %upload.file_key, user_id = %session.user_id, "Upload recorded");
        Ok(upload)
    }

    pub async fn list(&self, _session: &Session) -> Result<Vec<Upload>, DomainError> {
        Ok(self.uploads.list_all().await?)
    }

    /// Delete the file at the provider, then its record.
    ///
    /// A provider failure leaves the record in place.
    pub async fn remove(&self, session: &Session, id: Uuid) -> Result<Upload, DomainError> {
        let upload = self
            .uploads
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("upload", id))?;

        self.storage
            .delete_files(std::slice::from_ref(&upload.file_key))
            .await
            .map_err(|err| {
                tracing::error!(upload_id = %id, error = %err, "Failed to delete file at provider");
                DomainError::Internal("Failed to delete file".to_string())
            })?;

        self.uploads.delete(id).await.map_err(|err| match err {
            RepoError::NotFound => DomainError::not_found("upload", id),
            other => other.into(),
        })?;

        tracing::info!(upload_id = %id, user_id = %session.user_id, "Upload deleted");
        Ok(upload)
    }
}
