//! Repository trait for short link data access.

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for short links.
///
/// This is the only path through which records are read or written.
/// Implementations must make two guarantees at the storage level:
///
/// - [`insert`](Self::insert) never persists a second record with an existing
///   slug, even when called concurrently with the same candidate.
/// - [`increment_visit`](Self::increment_visit) is a single indivisible
///   read-increment-write; concurrent calls never lose an update.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryLinkRepository`] - process-local store
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Finds a link by its slug (exact match).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<ShortLink>, AppError>;

    /// Finds a link by the canonical form of its URL (exact match on
    /// `normalized_url`).
    ///
    /// Used to de-duplicate shorten requests. If several records share a
    /// canonical URL, the oldest one is returned.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn find_by_url(&self, normalized_url: &str) -> Result<Option<ShortLink>, AppError>;

    /// Returns true if a record already uses `slug`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn exists_slug(&self, slug: &str) -> Result<bool, AppError>;

    /// Persists a new link with `visitor_count = 0` and `created_time = now`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::DuplicateSlug`] if the slug is already taken.
    /// Returns [`AppError::Internal`] on storage errors.
    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, AppError>;

    /// Atomically increments the visitor count of `slug` by one.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(ShortLink))` with the updated counter
    /// - `Ok(None)` if no record matches
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    async fn increment_visit(&self, slug: &str) -> Result<Option<ShortLink>, AppError>;

    /// Returns true if the store is reachable.
    async fn health_check(&self) -> bool;
}
