use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AuthorSummary;
use crate::error::DomainError;

pub const CATEGORY_NAME_MAX_LEN: usize = 64;

/// Category entity - groups posts on the public site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Create a new category owned by `user_id`.
    pub fn new(user_id: Uuid, name: &str) -> Result<Self, DomainError> {
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            name: Self::normalize_name(name)?,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn rename(&mut self, name: &str) -> Result<(), DomainError> {
        self.name = Self::normalize_name(name)?;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn url(&self) -> String {
        format!("/blog/category/{}", self.id)
    }

    fn normalize_name(name: &str) -> Result<String, DomainError> {
        let name = name.split_whitespace().collect::<Vec<_>>().join(" ");
        if name.is_empty() {
            return Err(DomainError::invalid("category name is required"));
        }
        if name.chars().count() > CATEGORY_NAME_MAX_LEN {
            return Err(DomainError::invalid(format!(
                "category name cannot exceed {CATEGORY_NAME_MAX_LEN} characters"
            )));
        }
        Ok(name)
    }
}

/// Category together with the user who created it.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryWithOwner {
    #[serde(flatten)]
    pub category: Category,
    pub owner: Option<AuthorSummary>,
}
