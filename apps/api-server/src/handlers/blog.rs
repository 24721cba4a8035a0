//! Public blog handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::PageRequest;
use quill_core::domain::PostFilter;
use quill_shared::dto::PageQuery;

use crate::middleware::auth::OptionalIdentity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

async fn list(
    state: &AppState,
    identity: OptionalIdentity,
    filter: PostFilter,
    query: PageQuery,
) -> AppResult<HttpResponse> {
    let page = PageRequest::new(query.page.unwrap_or(1))?;
    let viewer = identity.0.as_ref().map(|i| &i.0);
    let listing = state.blog.list(filter, page, viewer).await?;

    Ok(HttpResponse::Ok().json(listing))
}

/// GET /api/blog/posts?page=
pub async fn list_posts(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    list(&state, identity, PostFilter::All, query.into_inner()).await
}

/// GET /api/blog/categories/{id}/posts?page=
pub async fn list_category_posts(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<Uuid>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let filter = PostFilter::Category(path.into_inner());
    list(&state, identity, filter, query.into_inner()).await
}

/// GET /api/blog/tags/{tag}/posts?page=
pub async fn list_tag_posts(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let filter = PostFilter::Tag(path.into_inner());
    list(&state, identity, filter, query.into_inner()).await
}

/// GET /api/blog/posts/{slug} - counts as a view
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let post = state.blog.view_by_slug(&path).await?;
    Ok(HttpResponse::Ok().json(post))
}
