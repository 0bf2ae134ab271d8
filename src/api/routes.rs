//! API route configuration.

use crate::api::handlers::{redirect_handler, shorten_handler, stats_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Short link routes.
///
/// Paths are declared without a trailing slash; the top-level router trims
/// it before matching, so `/urls/shorten/` and `/urls/shorten` are equivalent.
///
/// # Endpoints
///
/// - `POST /urls/shorten`        - Shorten a URL (201 new, 303 existing)
/// - `GET  /urls/{slug}`         - Resolve a slug and count the visit
/// - `GET  /urls/{slug}/stats`   - Visit count and creation time
pub fn link_routes() -> Router<AppState> {
    Router::new()
        .route("/urls/shorten", post(shorten_handler))
        .route("/urls/{slug}", get(redirect_handler))
        .route("/urls/{slug}/stats", get(stats_handler))
}
