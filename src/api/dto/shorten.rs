//! DTOs for link shortening endpoint.

use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::Value;
use validator::Validate;

use crate::error::AppError;

/// Message returned when the `url` field is absent or null.
pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// Message returned when `url` is not a string or number.
pub const NOT_A_STRING_MESSAGE: &str = "Not a valid string.";

/// Request to shorten a URL.
///
/// ```json
/// { "url": "https://example.com/some/long/path" }
/// ```
///
/// Numbers are accepted for `url` and read as their decimal text, so they
/// fail URL validation rather than deserialization.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    #[validate(
        length(max = 200, message = "Ensure this field has no more than 200 characters."),
        url(message = "Enter a valid URL.")
    )]
    pub url: Option<String>,
}

impl ShortenRequest {
    /// Reads the request from an already-parsed JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the body is not an object or `url`
    /// has an unusable type.
    pub fn from_json(body: Value) -> Result<Self, AppError> {
        if !body.is_object() {
            return Err(AppError::bad_request(
                "Invalid request body",
                serde_json::json!({
                    "non_field_errors": [format!(
                        "Invalid data. Expected a dictionary, but got {}.",
                        json_type_name(&body)
                    )]
                }),
            ));
        }

        serde_json::from_value(body).map_err(|_| AppError::invalid_field("url", NOT_A_STRING_MESSAGE))
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

fn deserialize_lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(_) => Err(de::Error::custom(NOT_A_STRING_MESSAGE)),
    }
}

/// Location of the short link, relative to the service root.
///
/// ```json
/// { "location": "/urls/aB3xY9/" }
/// ```
#[derive(Debug, Serialize, Deserialize)]
pub struct LocationResponse {
    pub location: String,
}
