//! Category management handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_shared::dto::CategoryPayload;

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/admin/categories
pub async fn list(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let categories = state.categories.list_with_owner(&identity).await?;
    Ok(HttpResponse::Ok().json(categories))
}

/// POST /api/admin/categories
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CategoryPayload>,
) -> AppResult<HttpResponse> {
    let category = state.categories.create(&identity, &body.name).await?;
    Ok(HttpResponse::Created().json(category))
}

/// PUT /api/admin/categories/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<CategoryPayload>,
) -> AppResult<HttpResponse> {
    let category = state
        .categories
        .update(&identity, path.into_inner(), &body.name)
        .await?;
    Ok(HttpResponse::Ok().json(category))
}

/// DELETE /api/admin/categories/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let category = state.categories.remove(&identity, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(category))
}
