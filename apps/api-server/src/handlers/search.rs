//! Site search handler.

use actix_web::{HttpResponse, web};

use quill_shared::dto::SearchQuery;

use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/search?q=
pub async fn search(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> AppResult<HttpResponse> {
    let results = state.search.search(&query.q).await?;
    Ok(HttpResponse::Ok().json(results))
}
