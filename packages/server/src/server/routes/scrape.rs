use axum::{
    extract::{rejection::JsonRejection, Extension},
    Json,
};

use crate::common::ApiError;
use crate::domains::scrape::{run_scrape, ScrapeRequest, ScrapeResponse};
use crate::server::app::AppState;

/// `POST /scrape`
///
/// Body: `{"sourceUrl": ..., "destinationId": ..., "limit": ...}`.
/// Answers `{"status": "ok", "count": n}` where `n` is the number of post
/// rows written.
pub async fn scrape_handler(
    Extension(state): Extension<AppState>,
    payload: Result<Json<ScrapeRequest>, JsonRejection>,
) -> Result<Json<ScrapeResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::validation(rejection.body_text()))?;
    let request = request.validate()?;

    let outcome = run_scrape(&request, &state.server_deps).await?;

    Ok(Json(ScrapeResponse::ok(outcome.sync.written)))
}
