use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AuthorSummary, Role};

/// User entity - accounts are provisioned by the auth provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
    pub role: Role,
    pub saved_post_ids: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    pub fn new(name: String, email: String, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            image: None,
            role,
            saved_post_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns false when the post was already saved.
    pub fn save_post(&mut self, post_id: Uuid) -> bool {
        if self.saved_post_ids.contains(&post_id) {
            return false;
        }
        self.saved_post_ids.push(post_id);
        self.updated_at = Utc::now();
        true
    }

    /// Returns false when the post was not saved.
    pub fn unsave_post(&mut self, post_id: Uuid) -> bool {
        let before = self.saved_post_ids.len();
        self.saved_post_ids.retain(|id| *id != post_id);
        let removed = self.saved_post_ids.len() != before;
        if removed {
            self.updated_at = Utc::now();
        }
        removed
    }

    pub fn summary(&self) -> AuthorSummary {
        AuthorSummary {
            id: self.id,
            name: self.name.clone(),
            image: self.image.clone(),
        }
    }
}
