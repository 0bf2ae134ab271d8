#![allow(dead_code)]

use axum::Router;
use axum_test::TestServer;
use shortlink::domain::entities::{NewShortLink, ShortLink};
use shortlink::domain::repositories::LinkRepository;
use shortlink::infrastructure::persistence::InMemoryLinkRepository;
use shortlink::routes::app_router;
use shortlink::state::AppState;
use shortlink::utils::url_normalizer::normalize_url;
use std::sync::Arc;

pub fn create_test_state() -> (AppState, Arc<InMemoryLinkRepository>) {
    let repo = Arc::new(InMemoryLinkRepository::new());
    let state = AppState::new(repo.clone());

    (state, repo)
}

/// Full application router, trailing-slash normalization included.
pub fn create_test_app(state: AppState) -> Router {
    Router::new().fallback_service(app_router(state))
}

pub fn create_test_server(state: AppState) -> TestServer {
    TestServer::new(create_test_app(state)).unwrap()
}

pub async fn create_test_link(repo: &InMemoryLinkRepository, slug: &str, url: &str) -> ShortLink {
    repo.insert(NewShortLink {
        slug: slug.to_string(),
        original_url: url.to_string(),
        normalized_url: normalize_url(url).unwrap_or_else(|_| url.to_string()),
    })
    .await
    .unwrap()
}

pub fn is_short_location(location: &str) -> bool {
    location
        .strip_prefix("/urls/")
        .and_then(|rest| rest.strip_suffix('/'))
        .is_some_and(|slug| slug.len() == 6 && slug.chars().all(|c| c.is_ascii_alphanumeric()))
}

pub fn slug_from_location(location: &str) -> String {
    location
        .trim_start_matches("/urls/")
        .trim_end_matches('/')
        .to_string()
}
