//! Author-facing post actions.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use super::load_entry;
use crate::domain::{Post, PostDetail, PostEntry, PostFields, PostInput, RelatedPost, Session};
use crate::error::{DomainError, RepoError};
use crate::ports::{CategoryRepository, PostRepository, UserRepository};

/// Posts shown on the dashboard and in the "recent" list.
pub const RECENT_POSTS_LIMIT: u64 = 10;

/// Views per post, for the dashboard chart.
#[derive(Debug, Clone, Serialize)]
pub struct PostStat {
    pub id: Uuid,
    pub title: String,
    pub views: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardStats {
    pub total_posts: u64,
    pub total_categories: u64,
    pub total_views: i64,
    pub top_posts: Vec<PostStat>,
}

pub struct PostService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    categories: Arc<dyn CategoryRepository>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        categories: Arc<dyn CategoryRepository>,
    ) -> Self {
        Self {
            posts,
            users,
            categories,
        }
    }

    pub async fn create(&self, session: &Session, input: PostInput) -> Result<Post, DomainError> {
        let mut fields = input.normalize()?;
        self.check_references(None, &fields).await?;

        let related = fields.related_post_ids.take();
        let post = Post::new(session.user_id, fields);
        let slug = post.slug.clone();

        let post = self
            .posts
            .insert(post)
            .await
            .map_err(|err| slug_conflict(err, &slug))?;

        if let Some(related) = related.filter(|r| !r.is_empty()) {
            self.posts.replace_related(post.id, &related).await?;
        }

        tracing::info!(post_id = %post.id, slug = %post.slug, user_id = %session.user_id, "Post created");
        Ok(post)
    }

    /// Replace a post's editable fields. Ownership never changes.
    pub async fn update(
        &self,
        session: &Session,
        id: Uuid,
        input: PostInput,
    ) -> Result<Post, DomainError> {
        let mut post = self.find(id).await?;
        session.ensure_can_modify(post.user_id)?;

        let mut fields = input.normalize()?;
        self.check_references(Some(id), &fields).await?;

        let related = fields.related_post_ids.take();
        post.apply(fields);
        let slug = post.slug.clone();

        let post = self.posts.update(post).await.map_err(|err| match err {
            RepoError::NotFound => DomainError::not_found("post", id),
            other => slug_conflict(other, &slug),
        })?;

        // An explicit empty list clears the relations; absence leaves them.
        if let Some(related) = related {
            self.posts.replace_related(post.id, &related).await?;
        }

        tracing::info!(post_id = %post.id, user_id = %session.user_id, "Post updated");
        Ok(post)
    }

    /// Delete a post and return what was removed.
    pub async fn remove(&self, session: &Session, id: Uuid) -> Result<Post, DomainError> {
        let post = self.find(id).await?;
        session.ensure_can_modify(post.user_id)?;

        self.posts.delete(id).await.map_err(|err| match err {
            RepoError::NotFound => DomainError::not_found("post", id),
            other => other.into(),
        })?;

        tracing::info!(post_id = %id, user_id = %session.user_id, "Post deleted");
        Ok(post)
    }

    /// Any post by id, whatever its status, for the editor.
    pub async fn get(&self, _session: &Session, id: Uuid) -> Result<PostDetail, DomainError> {
        let post = self.find(id).await?;
        let related_posts = self
            .posts
            .related_posts(id)
            .await?
            .into_iter()
            .map(RelatedPost::from)
            .collect();
        let entry = load_entry(post, self.users.as_ref(), self.categories.as_ref()).await?;

        Ok(PostDetail {
            entry,
            related_posts,
        })
    }

    /// Every post owned by the caller, newest update first.
    pub async fn list_mine(&self, session: &Session) -> Result<Vec<PostEntry>, DomainError> {
        Ok(self.posts.find_by_user_id(session.user_id, None).await?)
    }

    pub async fn recent_mine(&self, session: &Session) -> Result<Vec<Post>, DomainError> {
        let entries = self
            .posts
            .find_by_user_id(session.user_id, Some(RECENT_POSTS_LIMIT))
            .await?;
        Ok(entries.into_iter().map(|e| e.post).collect())
    }

    pub async fn dashboard(&self, session: &Session) -> Result<DashboardStats, DomainError> {
        let total_posts = self.posts.count_by_user(session.user_id).await?;
        let total_views = self.posts.total_views_by_user(session.user_id).await?;
        let total_categories = self.categories.count_all().await?;
        let top_posts = self
            .recent_mine(session)
            .await?
            .into_iter()
            .map(|p| PostStat {
                id: p.id,
                title: p.title,
                views: p.views,
            })
            .collect();

        Ok(DashboardStats {
            total_posts,
            total_categories,
            total_views,
            top_posts,
        })
    }

    async fn find(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("post", id))
    }

    /// Category and related posts must exist; a post cannot relate to itself.
    async fn check_references(
        &self,
        own_id: Option<Uuid>,
        fields: &PostFields,
    ) -> Result<(), DomainError> {
        let mut errors = Vec::new();

        if let Some(category_id) = fields.category_id {
            if self.categories.find_by_id(category_id).await?.is_none() {
                errors.push(format!("category {category_id} does not exist"));
            }
        }

        for related_id in fields.related_post_ids.iter().flatten() {
            if Some(*related_id) == own_id {
                errors.push("a post cannot be related to itself".to_string());
            } else if self.posts.find_by_id(*related_id).await?.is_none() {
                errors.push(format!("related post {related_id} does not exist"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(errors))
        }
    }
}

fn slug_conflict(err: RepoError, slug: &str) -> DomainError {
    match err {
        RepoError::Constraint(_) => {
            DomainError::Duplicate(format!("a post with slug '{slug}' already exists"))
        }
        other => other.into(),
    }
}
