//! Handler for link statistics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::link::LinkResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the visit count and creation time of a short link.
///
/// # Endpoint
///
/// `GET /urls/{slug}/stats/`
///
/// Read-only: the visitor counter is not modified.
///
/// # Errors
///
/// Returns 404 Not Found if the slug is unknown.
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<LinkResponse>, AppError> {
    let link = state.link_service.stats(&slug).await?;

    Ok(Json(link.into()))
}
