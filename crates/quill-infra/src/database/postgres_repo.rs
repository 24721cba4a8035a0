//! PostgreSQL repository implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func, IntoColumnRef, LikeExpr, SimpleExpr};
use sea_orm::{
    ColumnTrait, Condition, DbConn, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

use quill_core::domain::{Category, CategoryWithOwner, Post, PostStatus, Upload, User};
use quill_core::error::RepoError;
use quill_core::ports::{CategoryRepository, SearchRepository, UploadRepository, UserRepository};

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::upload::{self, Entity as UploadEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL category repository.
pub type PostgresCategoryRepository = PostgresBaseRepository<CategoryEntity>;

/// PostgreSQL upload metadata repository.
pub type PostgresUploadRepository = PostgresBaseRepository<UploadEntity>;

/// Mask an email for logging to avoid PII in logs.
pub(crate) fn mask_email(email: &str) -> String {
    match email.find('@') {
        Some(at_pos) => {
            let (local, domain) = email.split_at(at_pos);
            let masked_local = match local.chars().next() {
                Some(first) if local.chars().count() > 1 => format!("{first}***"),
                _ => "***".to_string(),
            };
            format!("{masked_local}{domain}")
        }
        None => "***".to_string(),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn list_all(&self) -> Result<Vec<User>, RepoError> {
        let result = UserEntity::find()
            .order_by_asc(user::Column::Name)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl CategoryRepository for PostgresCategoryRepository {
    async fn list_all(&self) -> Result<Vec<Category>, RepoError> {
        let result = CategoryEntity::find()
            .order_by_desc(category::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn count_all(&self) -> Result<u64, RepoError> {
        CategoryEntity::find().count(&self.db).await.map_err(map_db_err)
    }

    async fn list_with_owner(&self) -> Result<Vec<CategoryWithOwner>, RepoError> {
        let categories = CategoryEntity::find()
            .order_by_desc(category::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        let owner_ids: Vec<Uuid> = categories.iter().map(|c| c.user_id).collect();
        let owners: HashMap<Uuid, User> = if owner_ids.is_empty() {
            HashMap::new()
        } else {
            UserEntity::find()
                .filter(user::Column::Id.is_in(owner_ids))
                .all(&self.db)
                .await
                .map_err(map_db_err)?
                .into_iter()
                .map(|m| (m.id, User::from(m)))
                .collect()
        };

        Ok(categories
            .into_iter()
            .map(|model| {
                let owner = owners.get(&model.user_id).map(User::summary);
                CategoryWithOwner {
                    category: model.into(),
                    owner,
                }
            })
            .collect())
    }
}

#[async_trait]
impl UploadRepository for PostgresUploadRepository {
    async fn list_all(&self) -> Result<Vec<Upload>, RepoError> {
        let result = UploadEntity::find()
            .order_by_desc(upload::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

/// Site search over posts and categories.
pub struct PostgresSearchRepository {
    pub(crate) db: DbConn,
}

impl PostgresSearchRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

/// `%query%` with LIKE wildcards in the query escaped.
fn contains_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn lower_like(column: impl IntoColumnRef, pattern: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).like(LikeExpr::new(pattern).escape('\\'))
}

#[async_trait]
impl SearchRepository for PostgresSearchRepository {
    async fn search_posts(&self, query: &str, limit: u64) -> Result<Vec<Post>, RepoError> {
        let pattern = contains_pattern(query);
        tracing::debug!(%query, "Searching posts");

        let result = PostEntity::find()
            .filter(post::Column::Status.eq(post::Status::from(PostStatus::Published)))
            .filter(
                Condition::any()
                    .add(lower_like(post::Column::Title, &pattern))
                    .add(lower_like(post::Column::Content, &pattern))
                    .add(Expr::cust_with_values("? = ANY(tags)", [query.to_string()])),
            )
            .order_by_desc(post::Column::UpdatedAt)
            .order_by_desc(post::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn search_categories(
        &self,
        query: &str,
        limit: u64,
    ) -> Result<Vec<Category>, RepoError> {
        let pattern = contains_pattern(query);

        let result = CategoryEntity::find()
            .filter(lower_like(category::Column::Name, &pattern))
            .order_by_desc(category::Column::UpdatedAt)
            .order_by_desc(category::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}
