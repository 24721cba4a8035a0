//! UploadThing file storage client.

use async_trait::async_trait;
use serde::Serialize;

use quill_core::ports::{FileStorage, StorageError};

/// UploadThing API configuration.
#[derive(Debug, Clone)]
pub struct UploadThingConfig {
    pub api_key: String,
    pub api_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteFilesRequest<'a> {
    file_keys: &'a [String],
}

pub struct UploadThingStorage {
    client: reqwest::Client,
    config: UploadThingConfig,
}

impl UploadThingStorage {
    pub fn new(config: UploadThingConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.api_url.trim_end_matches('/'), path)
    }
}

#[async_trait]
impl FileStorage for UploadThingStorage {
    async fn delete_files(&self, keys: &[String]) -> Result<(), StorageError> {
        let response = self
            .client
            .post(self.endpoint("/v6/deleteFiles"))
            .header("x-uploadthing-api-key", &self.config.api_key)
            .json(&DeleteFilesRequest { file_keys: keys })
            .send()
            .await
            .map_err(|e| StorageError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::debug!(count = keys.len(), "Deleted files from UploadThing");
        Ok(())
    }
}
