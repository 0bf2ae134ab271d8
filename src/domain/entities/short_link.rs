//! Short link entity: a slug mapped to its original URL.

use chrono::{DateTime, Utc};

/// A stored short link.
///
/// `original_url` is the text the client submitted and is what redirects
/// return; `normalized_url` is its canonical form, used only as the
/// de-duplication key. `slug` and `created_time` never change after creation;
/// `visitor_count` only grows, one step per redirect.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ShortLink {
    pub id: i64,
    pub slug: String,
    pub original_url: String,
    pub normalized_url: String,
    pub visitor_count: i64,
    pub created_time: DateTime<Utc>,
}

impl ShortLink {
    /// Creates a new ShortLink instance.
    pub fn new(
        id: i64,
        slug: String,
        original_url: String,
        normalized_url: String,
        visitor_count: i64,
        created_time: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            slug,
            original_url,
            normalized_url,
            visitor_count,
            created_time,
        }
    }
}

/// Input data for persisting a new short link.
///
/// The store assigns `id`, sets `visitor_count = 0` and `created_time = now`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewShortLink {
    pub slug: String,
    pub original_url: String,
    pub normalized_url: String,
}
