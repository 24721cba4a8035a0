use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Category, CategoryWithOwner, Post, PostEntry, PostFilter, Upload, User};
use crate::error::RepoError;
use crate::pagination::PageRequest;

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity. Unique-key collisions fail with `RepoError::Constraint`.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity. Missing rows fail with `RepoError::NotFound`.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    async fn list_all(&self) -> Result<Vec<User>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    /// One page of published posts, newest update first, with the total
    /// matching count read in the same transaction.
    async fn list_published(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> Result<(Vec<PostEntry>, u64), RepoError>;

    /// A user's posts (any status), newest update first.
    async fn find_by_user_id(
        &self,
        user_id: Uuid,
        limit: Option<u64>,
    ) -> Result<Vec<PostEntry>, RepoError>;

    /// Atomically add one view and return the updated post.
    async fn increment_views(&self, id: Uuid) -> Result<Post, RepoError>;

    async fn related_posts(&self, id: Uuid) -> Result<Vec<Post>, RepoError>;

    /// Replace the set of posts related to `id`.
    async fn replace_related(&self, id: Uuid, related: &[Uuid]) -> Result<(), RepoError>;

    async fn total_views_by_user(&self, user_id: Uuid) -> Result<i64, RepoError>;

    async fn count_by_user(&self, user_id: Uuid) -> Result<u64, RepoError>;
}

/// Category repository.
#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Uuid> {
    /// All categories, newest first.
    async fn list_all(&self) -> Result<Vec<Category>, RepoError>;

    async fn count_all(&self) -> Result<u64, RepoError>;

    async fn list_with_owner(&self) -> Result<Vec<CategoryWithOwner>, RepoError>;
}

/// Upload metadata repository.
#[async_trait]
pub trait UploadRepository: BaseRepository<Upload, Uuid> {
    /// All uploads, newest first.
    async fn list_all(&self) -> Result<Vec<Upload>, RepoError>;
}

/// Case-insensitive substring lookups backing site search.
#[async_trait]
pub trait SearchRepository: Send + Sync {
    /// Published posts matching on title or content, or carrying `query` as a tag.
    async fn search_posts(&self, query: &str, limit: u64) -> Result<Vec<Post>, RepoError>;

    async fn search_categories(&self, query: &str, limit: u64)
    -> Result<Vec<Category>, RepoError>;
}
