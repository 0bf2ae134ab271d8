//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /urls/shorten/`       - Create or reuse a short link
//! - `GET  /urls/{slug}/`        - Resolve a short link
//! - `GET  /urls/{slug}/stats/`  - Short link statistics
//! - `GET  /health`              - Storage health check
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::health_handler;
use crate::api::middleware::tracing;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// The returned service trims trailing slashes before routing, which is why it
/// wraps the [`Router`] rather than being one.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let router = Router::new()
        .merge(api::routes::link_routes())
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
