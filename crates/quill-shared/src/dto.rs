//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `?page=` query for listings. Missing means the first page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
}

/// `?q=` query for site search.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// A tag as sent by the editor: either a bare string or a select option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    Plain(String),
    Option { label: String, value: String },
}

impl TagValue {
    /// The stored tag text. Options contribute their `value`, not their label.
    pub fn into_value(self) -> String {
        match self {
            TagValue::Plain(value) | TagValue::Option { value, .. } => value,
        }
    }
}

/// Reference to a related post as sent by the editor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedPostRef {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Request to create or update a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostPayload {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub description: String,
    pub content: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub tags: Vec<TagValue>,
    pub status: String,
    #[serde(default)]
    pub reading_time_mins: Option<i32>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub repo_url: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub related_posts: Option<Vec<RelatedPostRef>>,
}

/// Request to create or rename a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryPayload {
    pub name: String,
}

/// Request to change a user's role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetRoleRequest {
    pub role: String,
}

/// Metadata reported once the upload provider stored a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordUploadRequest {
    pub name: String,
    pub url: String,
    pub file_key: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    pub size: i64,
}

/// Templated email requested by the auth provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendEmailRequest {
    pub to: String,
    pub subject: String,
    pub description: String,
    pub link: String,
}

/// Plain success flag, used by deletes and the email hook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Response containing a user's profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
    pub role: String,
    pub saved_post_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}
