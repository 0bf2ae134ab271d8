//! DTOs describing a stored short link.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::ShortLink;

/// Public view of a short link, returned by the redirect and stats endpoints.
///
/// ```json
/// {
///   "url": "https://example.com/",
///   "visitor_count": 3,
///   "created_time": "2024-01-15T10:30:00Z"
/// }
/// ```
#[derive(Debug, Serialize, Deserialize)]
pub struct LinkResponse {
    pub url: String,
    pub visitor_count: i64,
    pub created_time: DateTime<Utc>,
}

impl From<ShortLink> for LinkResponse {
    fn from(link: ShortLink) -> Self {
        Self {
            url: link.original_url,
            visitor_count: link.visitor_count,
            created_time: link.created_time,
        }
    }
}

/// Body of a resolved redirect: the original URL as `location`, plus the
/// updated record.
///
/// ```json
/// {
///   "location": "https://example.com",
///   "url": "https://example.com",
///   "visitor_count": 4,
///   "created_time": "2024-01-15T10:30:00Z"
/// }
/// ```
#[derive(Debug, Serialize, Deserialize)]
pub struct VisitResponse {
    pub location: String,
    #[serde(flatten)]
    pub link: LinkResponse,
}

impl From<ShortLink> for VisitResponse {
    fn from(link: ShortLink) -> Self {
        Self {
            location: link.original_url.clone(),
            link: link.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn test_visit_response_carries_location() {
        let created_time = Utc::now();
        let link = ShortLink::new(
            1,
            "aB3xY9".to_string(),
            "https://a.test".to_string(),
            "https://a.test/".to_string(),
            2,
            created_time,
        );

        let body = serde_json::to_value(VisitResponse::from(link)).unwrap();

        assert_eq!(
            body,
            json!({
                "location": "https://a.test",
                "url": "https://a.test",
                "visitor_count": 2,
                "created_time": created_time,
            })
        );
    }
}
