//! Callbacks from the auth provider.

use actix_web::{HttpRequest, HttpResponse, web};

use quill_core::ports::EmailMessage;
use quill_shared::dto::{SendEmailRequest, SuccessResponse};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

pub const HOOK_SECRET_HEADER: &str = "X-Hook-Secret";

/// POST /api/hooks/email
///
/// Renders and sends a templated email. Disabled unless `HOOK_SECRET` is
/// set; callers must echo it in the `X-Hook-Secret` header.
pub async fn send_email(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<SendEmailRequest>,
) -> AppResult<HttpResponse> {
    let Some(secret) = state.hook_secret.as_deref() else {
        return Err(AppError::NotFound("email hook is disabled".to_string()));
    };

    let provided = req
        .headers()
        .get(HOOK_SECRET_HEADER)
        .and_then(|v| v.to_str().ok());
    if provided != Some(secret) {
        tracing::warn!("Email hook called with a missing or wrong secret");
        return Err(AppError::Unauthorized);
    }

    let req = body.into_inner();
    let message = EmailMessage::new(req.to, req.subject, req.description, req.link);
    let success = state.notifications.send(&message).await;

    Ok(HttpResponse::Ok().json(SuccessResponse { success }))
}
