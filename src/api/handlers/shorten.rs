//! Handler for link shortening endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use validator::Validate;

use crate::api::dto::shorten::{LocationResponse, REQUIRED_MESSAGE, ShortenRequest};
use crate::error::AppError;
use crate::state::AppState;

/// Shortens a URL.
///
/// # Endpoint
///
/// `POST /urls/shorten/`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com" }
/// ```
///
/// # Response
///
/// - **201 Created**: a new short link was issued
/// - **303 See Other**: the URL was already shortened; the existing link is returned
///
/// Both carry the short link path in the body and in the `Location` header:
///
/// ```json
/// { "location": "/urls/aB3xY9/" }
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request with a JSON body if the URL is missing or invalid,
/// or if the body is not a JSON object.
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, AppError> {
    let Json(body) = payload.map_err(|rejection| {
        tracing::debug!(reason = %rejection.body_text(), "Rejected request body");
        AppError::bad_request(
            "Malformed request body",
            json!({ "detail": rejection.body_text() }),
        )
    })?;

    let request = ShortenRequest::from_json(body)?;
    request.validate()?;

    let Some(url) = request.url else {
        return Err(AppError::invalid_field("url", REQUIRED_MESSAGE));
    };

    let outcome = state.link_service.shorten(&url).await?;

    let status = if outcome.is_created() {
        StatusCode::CREATED
    } else {
        StatusCode::SEE_OTHER
    };
    let location = state.link_service.short_path(&outcome.link().slug);

    Ok((
        status,
        [(header::LOCATION, location.clone())],
        Json(LocationResponse { location }),
    )
        .into_response())
}
