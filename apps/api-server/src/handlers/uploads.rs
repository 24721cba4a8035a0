//! Upload metadata handlers. File bytes go straight to the storage provider.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use quill_core::domain::NewUpload;
use quill_shared::dto::RecordUploadRequest;

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/uploads
pub async fn list(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let uploads = state.uploads.list(&identity).await?;
    Ok(HttpResponse::Ok().json(uploads))
}

/// POST /api/uploads
pub async fn record(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<RecordUploadRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let upload = NewUpload {
        name: req.name,
        url: req.url,
        file_key: req.file_key,
        mime_type: req.mime_type,
        size: req.size,
    };

    let upload = state.uploads.record(&identity, upload).await?;
    Ok(HttpResponse::Created().json(upload))
}

/// DELETE /api/uploads/{id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let upload = state.uploads.remove(&identity, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(upload))
}
