//! Public blog reads: paginated listings and the single-post view.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use super::load_entry;
use crate::domain::{Post, PostDetail, PostEntry, PostFilter, RelatedPost, Session};
use crate::error::{DomainError, RepoError};
use crate::pagination::{Page, PageRequest};
use crate::ports::{CategoryRepository, PostRepository, UserRepository};

/// A listing page plus the viewer's saved posts.
#[derive(Debug, Clone, Serialize)]
pub struct PostListing {
    #[serde(flatten)]
    pub page: Page<PostEntry>,
    pub saved_post_ids: Vec<Uuid>,
}

pub struct BlogService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    categories: Arc<dyn CategoryRepository>,
}

impl BlogService {
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

    /// One page of published posts, optionally narrowed to a category or tag.
    pub async fn list(
        &self,
        filter: PostFilter,
        page: PageRequest,
        viewer: Option<&Session>,
    ) -> Result<PostListing, DomainError> {
        let saved_post_ids = match viewer {
            Some(session) => self
                .users
                .find_by_id(session.user_id)
                .await?
                .map(|u| u.saved_post_ids)
                .unwrap_or_default(),
            None => Vec::new(),
        };

        let (items, total_count) = self.posts.list_published(&filter, page).await?;
        tracing::debug!(?filter, page = page.page(), total_count, "Listed posts");

        Ok(PostListing {
            page: Page::new(items, total_count, page),
            saved_post_ids,
        })
    }

    /// Published post by slug. Counts as a view.
    pub async fn view_by_slug(&self, slug: &str) -> Result<PostDetail, DomainError> {
        let post = self
            .posts
            .find_by_slug(slug)
            .await?
            .filter(Post::is_published)
            .ok_or_else(|| DomainError::not_found("post", slug))?;

        let post = self.record_view(post.id).await?;
        let related_posts = self
            .posts
            .related_posts(post.id)
            .await?
            .into_iter()
            .filter(Post::is_published)
            .map(RelatedPost::from)
            .collect();
        let entry = load_entry(post, self.users.as_ref(), self.categories.as_ref()).await?;

        Ok(PostDetail {
            entry,
            related_posts,
        })
    }

    pub async fn record_view(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .increment_views(id)
            .await
            .map_err(|err| match err {
                RepoError::NotFound => DomainError::not_found("post", id),
                other => other.into(),
            })
    }
}
