use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

const KIB: i64 = 1024;
const MIB: i64 = 1024 * KIB;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "svg"];

/// Upload entity - metadata for a file held by the upload provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Upload {
    pub id: Uuid,
    pub name: String,
    pub url: String,
    pub file_key: String,
    pub mime_type: String,
    pub size: i64,
    pub created_at: DateTime<Utc>,
}

/// File families accepted by the upload routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Image,
    Video,
    Pdf,
    Text,
}

impl UploadKind {
    /// Classify by mime type, falling back to the file extension.
    pub fn classify(mime_type: &str, name: &str) -> Option<Self> {
        let mime = mime_type.trim().to_ascii_lowercase();
        if !mime.is_empty() {
            return match mime.as_str() {
                m if m.starts_with("image/") => Some(Self::Image),
                m if m.starts_with("video/") => Some(Self::Video),
                "application/pdf" => Some(Self::Pdf),
                "text/plain" => Some(Self::Text),
                _ => None,
            };
        }

        let ext = name.rsplit_once('.')?.1.to_ascii_lowercase();
        match ext.as_str() {
            e if IMAGE_EXTENSIONS.contains(&e) => Some(Self::Image),
            "pdf" => Some(Self::Pdf),
            "txt" => Some(Self::Text),
            _ => None,
        }
    }

    /// Largest accepted file size in bytes.
    pub fn max_size(&self) -> i64 {
        match self {
            Self::Image => 4 * MIB,
            Self::Video => 128 * MIB,
            Self::Pdf => 8 * MIB,
            Self::Text => 64 * KIB,
        }
    }
}

/// Metadata reported after the provider stored a file.
#[derive(Debug, Clone)]
pub struct NewUpload {
    pub name: String,
    pub url: String,
    pub file_key: String,
    pub mime_type: String,
    pub size: i64,
}

impl NewUpload {
    pub fn validate(self) -> Result<Upload, DomainError> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push("name is required".to_string());
        }
        if self.file_key.trim().is_empty() {
            errors.push("file_key is required".to_string());
        }
        if !(self.url.starts_with("https://") || self.url.starts_with("http://")) {
            errors.push("url must be an http(s) address".to_string());
        }
        if self.size < 0 {
            errors.push("size cannot be negative".to_string());
        }

        match UploadKind::classify(&self.mime_type, &self.name) {
            Some(kind) if self.size > kind.max_size() => errors.push(format!(
                "file exceeds the {} byte limit for its type",
                kind.max_size()
            )),
            Some(_) => {}
            None => errors.push(format!("unsupported file type: {}", self.mime_type)),
        }

        if !errors.is_empty() {
            return Err(DomainError::Validation(errors));
        }

        Ok(Upload {
            id: Uuid::new_v4(),
            name: self.name.trim().to_string(),
            url: self.url,
            file_key: self.file_key.trim().to_string(),
            mime_type: self.mime_type,
            size: self.size,
            created_at: Utc::now(),
        })
    }
}
