//! PostgreSQL post repository: listings, views and related posts.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use quill_core::domain::{Category, Post, PostEntry, PostFilter, PostStatus, User};
use quill_core::error::RepoError;
use quill_core::pagination::PageRequest;
use quill_core::ports::PostRepository;

use super::entity::category::{self, Entity as CategoryEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_relation::{self, Entity as PostRelationEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::map_db_err;
use super::postgres_repo::PostgresPostRepository;

/// Batch-load authors and categories for a page of posts.
async fn attach_entries<C>(conn: &C, models: Vec<post::Model>) -> Result<Vec<PostEntry>, DbErr>
where
    C: ConnectionTrait,
{
    let user_ids: HashSet<Uuid> = models.iter().map(|m| m.user_id).collect();
    let category_ids: HashSet<Uuid> = models.iter().filter_map(|m| m.category_id).collect();

    let authors: HashMap<Uuid, User> = if user_ids.is_empty() {
        HashMap::new()
    } else {
        UserEntity::find()
            .filter(user::Column::Id.is_in(user_ids))
            .all(conn)
            .await?
            .into_iter()
            .map(|m| (m.id, User::from(m)))
            .collect()
    };

    let categories: HashMap<Uuid, Category> = if category_ids.is_empty() {
        HashMap::new()
    } else {
        CategoryEntity::find()
            .filter(category::Column::Id.is_in(category_ids))
            .all(conn)
            .await?
            .into_iter()
            .map(|m| (m.id, Category::from(m)))
            .collect()
    };

    Ok(models
        .into_iter()
        .map(|model| {
            let post = Post::from(model);
            PostEntry {
                author: authors.get(&post.user_id).map(User::summary),
                category: post.category_id.and_then(|id| categories.get(&id).cloned()),
                post,
            }
        })
        .collect())
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn list_published(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> Result<(Vec<PostEntry>, u64), RepoError> {
        let published = post::Status::from(PostStatus::Published);
        let mut query = PostEntity::find().filter(post::Column::Status.eq(published));
        query = match filter {
            PostFilter::All => query,
            PostFilter::Category(id) => query.filter(post::Column::CategoryId.eq(*id)),
            PostFilter::Tag(tag) => {
                query.filter(Expr::cust_with_values("? = ANY(tags)", [tag.clone()]))
            }
        };

        let txn = self.db.begin().await.map_err(map_db_err)?;

        let models = query
            .clone()
            .order_by_desc(post::Column::UpdatedAt)
            .order_by_desc(post::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&txn)
            .await
            .map_err(map_db_err)?;
        let total = query.count(&txn).await.map_err(map_db_err)?;
        let entries = attach_entries(&txn, models).await.map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;

        tracing::debug!(?filter, page = page.page(), total, "Listed published posts");
        Ok((entries, total))
    }

    async fn find_by_user_id(
        &self,
        user_id: Uuid,
        limit: Option<u64>,
    ) -> Result<Vec<PostEntry>, RepoError> {
        let models = PostEntity::find()
            .filter(post::Column::UserId.eq(user_id))
            .order_by_desc(post::Column::UpdatedAt)
            .order_by_desc(post::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        attach_entries(&self.db, models).await.map_err(map_db_err)
    }

    async fn increment_views(&self, id: Uuid) -> Result<Post, RepoError> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let result = PostEntity::update_many()
            .col_expr(post::Column::Views, Expr::col(post::Column::Views).add(1))
            .filter(post::Column::Id.eq(id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        let model = PostEntity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(map_db_err)?
            .ok_or(RepoError::NotFound)?;

        txn.commit().await.map_err(map_db_err)?;
        Ok(model.into())
    }

    async fn related_posts(&self, id: Uuid) -> Result<Vec<Post>, RepoError> {
        let related_ids: Vec<Uuid> = PostRelationEntity::find()
            .filter(post_relation::Column::PostId.eq(id))
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(|r| r.related_post_id)
            .collect();

        if related_ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = PostEntity::find()
            .filter(post::Column::Id.is_in(related_ids))
            .order_by_desc(post::Column::UpdatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn replace_related(&self, id: Uuid, related: &[Uuid]) -> Result<(), RepoError> {
        let mut seen = HashSet::new();
        let rows: Vec<post_relation::ActiveModel> = related
            .iter()
            .filter(|rid| seen.insert(**rid))
            .map(|rid| post_relation::ActiveModel {
                post_id: Set(id),
                related_post_id: Set(*rid),
            })
            .collect();

        let txn = self.db.begin().await.map_err(map_db_err)?;

        PostRelationEntity::delete_many()
            .filter(post_relation::Column::PostId.eq(id))
            .exec(&txn)
            .await
            .map_err(map_db_err)?;

        if !rows.is_empty() {
            PostRelationEntity::insert_many(rows)
                .exec(&txn)
                .await
                .map_err(map_db_err)?;
        }

        txn.commit().await.map_err(map_db_err)
    }

    async fn total_views_by_user(&self, user_id: Uuid) -> Result<i64, RepoError> {
        let total: Option<i64> = PostEntity::find()
            .select_only()
            .column_as(Expr::cust("COALESCE(SUM(views), 0)::BIGINT"), "total")
            .filter(post::Column::UserId.eq(user_id))
            .into_tuple()
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(total.unwrap_or(0))
    }

    async fn count_by_user(&self, user_id: Uuid) -> Result<u64, RepoError> {
        PostEntity::find()
            .filter(post::Column::UserId.eq(user_id))
            .count(&self.db)
            .await
            .map_err(map_db_err)
    }
}
