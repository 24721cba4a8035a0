//! Category actions. Every operation requires a session.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Category, CategoryWithOwner, Session};
use crate::error::{DomainError, RepoError};
use crate::ports::CategoryRepository;

pub struct CategoryService {
    categories: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(categories: Arc<dyn CategoryRepository>) -> Self {
        Self { categories }
    }

    pub async fn create(&self, session: &Session, name: &str) -> Result<Category, DomainError> {
        let category = Category::new(session.user_id, name)?;
        let category = self.categories.insert(category).await?;

        tracing::info!(category_id = %category.id, user_id = %session.user_id, "Category created");
        Ok(category)
    }

    pub async fn update(
        &self,
        session: &Session,
        id: Uuid,
        name: &str,
    ) -> Result<Category, DomainError> {
        let mut category = self.find(id).await?;
        session.ensure_can_modify(category.user_id)?;

        category.rename(name)?;
        let category = self
            .categories
            .update(category)
            .await
            .map_err(|err| not_found_or(err, id))?;

        tracing::info!(category_id = %id, user_id = %session.user_id, "Category renamed");
        Ok(category)
    }

    /// Delete a category. Its posts stay, uncategorized.
    pub async fn remove(&self, session: &Session, id: Uuid) -> Result<Category, DomainError> {
        let category = self.find(id).await?;
        session.ensure_can_modify(category.user_id)?;

        self.categories
            .delete(id)
            .await
            .map_err(|err| not_found_or(err, id))?;

        tracing::info!(category_id = %id, user_id = %session.user_id, "Category deleted");
        Ok(category)
    }

    pub async fn list(&self, _session: &Session) -> Result<Vec<Category>, DomainError> {
        Ok(self.categories.list_all().await?)
    }

    pub async fn list_with_owner(
        &self,
        _session: &Session,
    ) -> Result<Vec<CategoryWithOwner>, DomainError> {
        Ok(self.categories.list_with_owner().await?)
    }

    async fn find(&self, id: Uuid) -> Result<Category, DomainError> {
        self.categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("category", id))
    }
}

fn not_found_or(err: RepoError, id: Uuid) -> DomainError {
    match err {
        RepoError::NotFound => DomainError::not_found("category", id),
        other => other.into(),
    }
}
