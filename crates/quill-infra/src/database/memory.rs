//! In-memory implementation of every repository port.
//!
//! Used when no `DATABASE_URL` is configured and by the service and handler
//! tests. Mirrors the PostgreSQL semantics: unique slugs, emails and file
//! keys, newest-update-first ordering, cascading user deletes and
//! `SET NULL` on category deletes.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{
    Category, CategoryWithOwner, Post, PostEntry, PostFilter, Upload, User,
};
use quill_core::error::RepoError;
use quill_core::pagination::PageRequest;
use quill_core::ports::{
    BaseRepository, CategoryRepository, PostRepository, SearchRepository, UploadRepository,
    UserRepository,
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    posts: HashMap<Uuid, Post>,
    categories: HashMap<Uuid, Category>,
    uploads: HashMap<Uuid, Upload>,
    relations: HashMap<Uuid, Vec<Uuid>>,
}

impl Tables {
    fn entry(&self, post: Post) -> PostEntry {
        PostEntry {
            author: self.users.get(&post.user_id).map(User::summary),
            category: post
                .category_id
                .and_then(|id| self.categories.get(&id).cloned()),
            post,
        }
    }

    fn remove_post(&mut self, id: Uuid) -> Option<Post> {
        let removed = self.posts.remove(&id)?;
        self.relations.remove(&id);
        for related in self.relations.values_mut() {
            related.retain(|r| *r != id);
        }
        Some(removed)
    }
}

/// Latest update first; ties fall back to id so paging is stable.
fn newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
}

fn to_usize(n: u64) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}

/// Thread-safe in-memory store.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.users.contains_key(&user.id) || tables.users.values().any(|u| u.email == user.email)
        {
            return Err(RepoError::Constraint("users_email_key".to_string()));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user.id) {
            return Err(RepoError::NotFound);
        }
        if tables
            .users
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(RepoError::Constraint("users_email_key".to_string()));
        }
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.users.remove(&id).ok_or(RepoError::NotFound)?;

        let owned_posts: Vec<Uuid> = tables
            .posts
            .values()
            .filter(|p| p.user_id == id)
            .map(|p| p.id)
            .collect();
        for post_id in owned_posts {
            tables.remove_post(post_id);
        }

        let owned_categories: HashSet<Uuid> = tables
            .categories
            .values()
            .filter(|c| c.user_id == id)
            .map(|c| c.id)
            .collect();
        tables.categories.retain(|cid, _| !owned_categories.contains(cid));
        for post in tables.posts.values_mut() {
            if post.category_id.is_some_and(|cid| owned_categories.contains(&cid)) {
                post.category_id = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn list_all(&self) -> Result<Vec<User>, RepoError> {
        let mut users: Vec<User> = self.tables.read().await.users.values().cloned().collect();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(users)
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.posts.contains_key(&post.id) || tables.posts.values().any(|p| p.slug == post.slug)
        {
            return Err(RepoError::Constraint("posts_slug_key".to_string()));
        }
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update(&self, mut post: Post) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        let views = tables
            .posts
            .get(&post.id)
            .map(|p| p.views)
            .ok_or(RepoError::NotFound)?;
        if tables
            .posts
            .values()
            .any(|p| p.id != post.id && p.slug == post.slug)
        {
            return Err(RepoError::Constraint("posts_slug_key".to_string()));
        }
        post.views = views;
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.remove_post(id).map(|_| ()).ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.values().find(|p| p.slug == slug).cloned())
    }

    async fn list_published(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> Result<(Vec<PostEntry>, u64), RepoError> {
        let tables = self.tables.read().await;
        let mut matching: Vec<Post> = tables
            .posts
            .values()
            .filter(|p| p.is_published())
            .filter(|p| match filter {
                PostFilter::All => true,
                PostFilter::Category(id) => p.category_id == Some(*id),
                PostFilter::Tag(tag) => p.tags.contains(tag),
            })
            .cloned()
            .collect();
        newest_first(&mut matching);

        let total = matching.len() as u64;
        let entries = matching
            .into_iter()
            .skip(to_usize(page.offset()))
            .take(to_usize(page.limit()))
            .map(|p| tables.entry(p))
            .collect();

        Ok((entries, total))
    }

    async fn find_by_user_id(
        &self,
        user_id: Uuid,
        limit: Option<u64>,
    ) -> Result<Vec<PostEntry>, RepoError> {
        let tables = self.tables.read().await;
        let mut owned: Vec<Post> = tables
            .posts
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        newest_first(&mut owned);

        Ok(owned
            .into_iter()
            .take(limit.map_or(usize::MAX, to_usize))
            .map(|p| tables.entry(p))
            .collect())
    }

    async fn increment_views(&self, id: Uuid) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        let post = tables.posts.get_mut(&id).ok_or(RepoError::NotFound)?;
        post.views += 1;
        Ok(post.clone())
    }

    async fn related_posts(&self, id: Uuid) -> Result<Vec<Post>, RepoError> {
        let tables = self.tables.read().await;
        let mut related: Vec<Post> = tables
            .relations
            .get(&id)
            .into_iter()
            .flatten()
            .filter_map(|rid| tables.posts.get(rid).cloned())
            .collect();
        newest_first(&mut related);
        Ok(related)
    }

    async fn replace_related(&self, id: Uuid, related: &[Uuid]) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        let mut seen = HashSet::new();
        let ids: Vec<Uuid> = related.iter().copied().filter(|r| seen.insert(*r)).collect();
        if ids.is_empty() {
            tables.relations.remove(&id);
        } else {
            tables.relations.insert(id, ids);
        }
        Ok(())
    }

    async fn total_views_by_user(&self, user_id: Uuid) -> Result<i64, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .values()
            .filter(|p| p.user_id == user_id)
            .map(|p| p.views)
            .sum())
    }

    async fn count_by_user(&self, user_id: Uuid) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.values().filter(|p| p.user_id == user_id).count() as u64)
    }
}

#[async_trait]
impl BaseRepository<Category, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn insert(&self, category: Category) -> Result<Category, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.categories.contains_key(&category.id) {
            return Err(RepoError::Constraint("categories_pkey".to_string()));
        }
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn update(&self, category: Category) -> Result<Category, RepoError> {
        let mut tables = self.tables.write().await;
        let slot = tables
            .categories
            .get_mut(&category.id)
            .ok_or(RepoError::NotFound)?;
        *slot = category.clone();
        Ok(category)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.categories.remove(&id).ok_or(RepoError::NotFound)?;
        for post in tables.posts.values_mut() {
            if post.category_id == Some(id) {
                post.category_id = None;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for InMemoryStore {
    async fn list_all(&self) -> Result<Vec<Category>, RepoError> {
        let mut categories: Vec<Category> = self
            .tables
            .read()
            .await
            .categories
            .values()
            .cloned()
            .collect();
        categories.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(categories)
    }

    async fn count_all(&self) -> Result<u64, RepoError> {
        Ok(self.tables.read().await.categories.len() as u64)
    }

    async fn list_with_owner(&self) -> Result<Vec<CategoryWithOwner>, RepoError> {
        let tables = self.tables.read().await;
        let mut categories: Vec<Category> = tables.categories.values().cloned().collect();
        categories.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(categories
            .into_iter()
            .map(|category| CategoryWithOwner {
                owner: tables.users.get(&category.user_id).map(User::summary),
                category,
            })
            .collect())
    }
}

#[async_trait]
impl BaseRepository<Upload, Uuid> for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Upload>, RepoError> {
        Ok(self.tables.read().await.uploads.get(&id).cloned())
    }

    async fn insert(&self, upload: Upload) -> Result<Upload, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.uploads.contains_key(&upload.id)
            || tables.uploads.values().any(|u| u.file_key == upload.file_key)
        {
            return Err(RepoError::Constraint("uploads_file_key_key".to_string()));
        }
        tables.uploads.insert(upload.id, upload.clone());
        Ok(upload)
    }

    async fn update(&self, upload: Upload) -> Result<Upload, RepoError> {
        let mut tables = self.tables.write().await;
        let slot = tables
            .uploads
            .get_mut(&upload.id)
            .ok_or(RepoError::NotFound)?;
        *slot = upload.clone();
        Ok(upload)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        tables.uploads.remove(&id).map(|_| ()).ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl UploadRepository for InMemoryStore {
    async fn list_all(&self) -> Result<Vec<Upload>, RepoError> {
        let mut uploads: Vec<Upload> =
            self.tables.read().await.uploads.values().cloned().collect();
        uploads.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(uploads)
    }
}

#[async_trait]
impl SearchRepository for InMemoryStore {
    async fn search_posts(&self, query: &str, limit: u64) -> Result<Vec<Post>, RepoError> {
        let needle = query.to_lowercase();
        let tables = self.tables.read().await;
        let mut hits: Vec<Post> = tables
            .posts
            .values()
            .filter(|p| p.is_published())
            .filter(|p| {
                p.title.to_lowercase().contains(&needle)
                    || p.content.to_lowercase().contains(&needle)
                    || p.tags.iter().any(|t| t == query)
            })
            .cloned()
            .collect();
        newest_first(&mut hits);
        hits.truncate(to_usize(limit));
        Ok(hits)
    }

    async fn search_categories(
        &self,
        query: &str,
        limit: u64,
    ) -> Result<Vec<Category>, RepoError> {
        let needle = query.to_lowercase();
        let tables = self.tables.read().await;
        let mut hits: Vec<Category> = tables
            .categories
            .values()
            .filter(|c| c.name.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        hits.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(b.id.cmp(&a.id)));
        hits.truncate(to_usize(limit));
        Ok(hits)
    }
}
