//! Author post handlers. Every route requires a session.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::{PostInput, PostStatus};
use quill_shared::dto::{PostPayload, TagValue};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn parse_status(status: &str) -> Result<PostStatus, AppError> {
    match status.trim().to_ascii_lowercase().as_str() {
        "draft" => Ok(PostStatus::Draft),
        "published" => Ok(PostStatus::Published),
        other => Err(AppError::Validation(vec![format!(
            "status must be 'draft' or 'published', got '{other}'"
        )])),
    }
}

fn into_input(payload: PostPayload) -> Result<PostInput, AppError> {
    Ok(PostInput {
        status: parse_status(&payload.status)?,
        title: payload.title,
        slug: payload.slug,
        description: payload.description,
        content: payload.content,
        image_url: payload.image_url,
        tags: payload.tags.into_iter().map(TagValue::into_value).collect(),
        reading_time_mins: payload.reading_time_mins,
        featured: payload.featured,
        repo_url: payload.repo_url,
        category_id: payload.category_id,
        related_post_ids: payload
            .related_posts
            .map(|related| related.into_iter().map(|r| r.id).collect()),
    })
}

/// GET /api/admin/posts
pub async fn list_mine(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let posts = state.posts.list_mine(&identity).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// GET /api/admin/posts/recent
pub async fn recent(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let posts = state.posts.recent_mine(&identity).await?;
    Ok(HttpResponse::Ok().json(posts))
}

/// POST /api/admin/posts
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PostPayload>,
) -> AppResult<HttpResponse> {
    let input = into_input(body.into_inner())?;
    let post = state.posts.create(&identity, input).await?;
    Ok(HttpResponse::Created().json(post))
}

/// GET /api/admin/posts/{id}
pub async fn get(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state.posts.get(&identity, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// PUT /api/admin/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<PostPayload>,
) -> AppResult<HttpResponse> {
    let input = into_input(body.into_inner())?;
    let post = state
        .posts
        .update(&identity, path.into_inner(), input)
        .await?;
    Ok(HttpResponse::Ok().json(post))
}

/// DELETE /api/admin/posts/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state.posts.remove(&identity, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// GET /api/admin/dashboard
pub async fn dashboard(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let stats = state.posts.dashboard(&identity).await?;
    Ok(HttpResponse::Ok().json(stats))
}
