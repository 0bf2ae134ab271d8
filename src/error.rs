//! Application error type and its HTTP mapping.
//!
//! | Variant         | Status | Body                                   |
//! |-----------------|--------|----------------------------------------|
//! | `Validation`    | 400    | field errors, `{"url": ["..."]}`       |
//! | `NotFound`      | 404    | `{"error": "<message>"}`               |
//! | `DuplicateSlug` | 500    | never expected at the HTTP boundary    |
//! | `Internal`      | 500    | `{"error": "<message>"}`               |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value, json};

/// Message returned for any unknown slug.
pub const SLUG_NOT_FOUND_MESSAGE: &str = "Short url id does not exist.";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, details: Value },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// The store rejected an insert because the slug is already taken.
    ///
    /// Recovered inside [`crate::application::services::LinkService::create`].
    #[error("slug already taken: {slug}")]
    DuplicateSlug { slug: String },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    /// Builds a validation error carrying a single message for a single field.
    pub fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        Self::Validation {
            details: json!({ field: [message.clone()] }),
            message,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    /// The fixed error returned for redirect and stats lookups on unknown slugs.
    pub fn slug_not_found(slug: &str) -> Self {
        Self::not_found(SLUG_NOT_FOUND_MESSAGE, json!({ "slug": slug }))
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation { details, .. } => {
                (StatusCode::BAD_REQUEST, Json(details)).into_response()
            }
            AppError::NotFound { message, .. } => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": message }))).into_response()
            }
            AppError::DuplicateSlug { slug } => {
                tracing::error!(slug = %slug, "duplicate slug escaped the retry loop");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal server error" })),
                )
                    .into_response()
            }
            AppError::Internal { message, details } => {
                tracing::error!(details = %details, "{}", message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": message })),
                )
                    .into_response()
            }
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::internal("Database error", json!({ "reason": e.to_string() }))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = Map::new();

        for (field, errs) in errors.field_errors() {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .map(Value::String)
                .collect();
            fields.insert(field.to_string(), Value::Array(messages));
        }

        AppError::bad_request("Validation failed", Value::Object(fields))
    }
}
