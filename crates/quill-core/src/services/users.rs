//! Profile, saved posts and admin role management.

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Role, Session, User};
use crate::error::DomainError;
use crate::ports::{PostRepository, UserRepository};

pub struct UserService {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, posts: Arc<dyn PostRepository>) -> Self {
        Self { users, posts }
    }

    /// The caller's stored profile.
    pub async fn me(&self, session: &Session) -> Result<User, DomainError> {
        self.find(session.user_id).await
    }

    /// All users, admins first, then alphabetically. Admin only.
    pub async fn list(&self, session: &Session) -> Result<Vec<User>, DomainError> {
        session.ensure_admin()?;

        let mut users = self.users.list_all().await?;
        users.sort_by(|a, b| {
            (b.role == Role::Admin)
                .cmp(&(a.role == Role::Admin))
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });
        Ok(users)
    }

    /// Change a user's role. Admin only; admins keep their role.
    pub async fn set_role(
        &self,
        session: &Session,
        user_id: Uuid,
        role: Role,
    ) -> Result<User, DomainError> {
        session.ensure_admin()?;
        if user_id == session.user_id {
            return Err(DomainError::invalid("you cannot change your own role"));
        }

        let mut user = self.find(user_id).await?;
        if user.role == role {
            return Ok(user);
        }
        if user.role == Role::Admin {
            return Err(DomainError::Forbidden);
        }

        user.role = role;
        user.updated_at = chrono::Utc::now();
        let user = self.users.update(user).await?;

        tracing::info!(user_id = %user.id, role = role.as_str(), changed_by = %session.user_id, "User role changed");
        Ok(user)
    }

    pub async fn save_post(&self, session: &Session, post_id: Uuid) -> Result<User, DomainError> {
        if self.posts.find_by_id(post_id).await?.is_none() {
            return Err(DomainError::not_found("post", post_id));
        }

        let mut user = self.find(session.user_id).await?;
        if !user.save_post(post_id) {
            return Ok(user);
        }
        Ok(self.users.update(user).await?)
    }

    pub async fn unsave_post(&self, session: &Session, post_id: Uuid) -> Result<User, DomainError> {
        let mut user = self.find(session.user_id).await?;
        if !user.unsave_post(post_id) {
            return Ok(user);
        }
        Ok(self.users.update(user).await?)
    }

    async fn find(&self, id: Uuid) -> Result<User, DomainError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("user", id))
    }
}
