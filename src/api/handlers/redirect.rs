//! Handler for short link resolution.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::link::VisitResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Resolves a slug to its original URL and counts the visit.
///
/// # Endpoint
///
/// `GET /urls/{slug}/`
///
/// The visitor counter is incremented atomically in storage before the
/// response is built, so the returned `visitor_count` already includes this
/// visit.
///
/// # Response
///
/// `location` and `url` both hold the URL exactly as it was submitted.
///
/// ```json
/// {
///   "location": "https://example.com",
///   "url": "https://example.com",
///   "visitor_count": 1,
///   "created_time": "2024-01-15T10:30:00Z"
/// }
/// ```
///
/// # Errors
///
/// Returns 404 Not Found with `{"error": "Short url id does not exist."}` if
/// the slug is unknown.
pub async fn redirect_handler(
    Path(slug): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<VisitResponse>, AppError> {
    let link = state.link_service.visit(&slug).await?;

    tracing::debug!(slug = %slug, visitor_count = link.visitor_count, "Visit recorded");

    Ok(Json(link.into()))
}
