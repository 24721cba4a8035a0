//! Profile, saved posts and role management.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::{Role, User};
use quill_shared::dto::{SetRoleRequest, UserResponse};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn to_response(user: User) -> UserResponse {
    UserResponse {
        id: user.id,
        name: user.name,
        email: user.email,
        image: user.image,
        role: user.role.as_str().to_string(),
        saved_post_ids: user.saved_post_ids,
        created_at: user.created_at,
    }
}

/// GET /api/me
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let user = state.users.me(&identity).await?;
    Ok(HttpResponse::Ok().json(to_response(user)))
}

/// GET /api/admin/users - admin only
pub async fn list(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let users: Vec<UserResponse> = state
        .users
        .list(&identity)
        .await?
        .into_iter()
        .map(to_response)
        .collect();
    Ok(HttpResponse::Ok().json(users))
}

/// PUT /api/admin/users/{id}/role - admin only
pub async fn set_role(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<SetRoleRequest>,
) -> AppResult<HttpResponse> {
    let role: Role = body.role.parse()?;
    let user = state
        .users
        .set_role(&identity, path.into_inner(), role)
        .await?;
    Ok(HttpResponse::Ok().json(to_response(user)))
}

/// PUT /api/me/saved-posts/{post_id}
pub async fn save_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let user = state.users.save_post(&identity, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(to_response(user)))
}

/// DELETE /api/me/saved-posts/{post_id}
pub async fn unsave_post(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let user = state.users.unsave_post(&identity, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(to_response(user)))
}
