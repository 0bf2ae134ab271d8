//! Short link creation, resolution and statistics service.

use std::sync::Arc;

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::slug_generator::random_slug;
use crate::utils::url_normalizer::normalize_url;

/// Message returned when a submitted URL cannot be shortened.
pub const INVALID_URL_MESSAGE: &str = "Enter a valid URL.";

/// Result of a shorten request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShortenOutcome {
    /// A new record was persisted.
    Created(ShortLink),
    /// The URL had already been shortened; no record was written.
    Existing(ShortLink),
}

impl ShortenOutcome {
    pub fn link(&self) -> &ShortLink {
        match self {
            Self::Created(link) | Self::Existing(link) => link,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Service for shortening URLs and resolving slugs.
///
/// Works against any [`LinkRepository`]; the server wires it with a trait
/// object so the storage backend is chosen at startup.
pub struct LinkService<L: LinkRepository + ?Sized> {
    link_repository: Arc<L>,
}

impl<L: LinkRepository + ?Sized> LinkService<L> {
    /// Creates a new link service.
    pub fn new(link_repository: Arc<L>) -> Self {
        Self { link_repository }
    }

    /// Shortens `long_url`, reusing the existing slug if the URL is known.
    ///
    /// The URL is canonicalised (see [`normalize_url`]) and de-duplication
    /// compares canonical forms. The submitted text itself is what gets stored
    /// and later returned by redirects.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the URL is malformed or uses an
    /// unsupported scheme.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn shorten(&self, long_url: &str) -> Result<ShortenOutcome, AppError> {
        let normalized_url = normalize_url(long_url).map_err(|e| {
            tracing::debug!(url = %long_url, reason = %e, "Rejected URL");
            AppError::invalid_field("url", INVALID_URL_MESSAGE)
        })?;

        if let Some(existing) = self.link_repository.find_by_url(&normalized_url).await? {
            tracing::debug!(slug = %existing.slug, "URL already shortened");
            metrics::counter!("shortlink_links_deduplicated_total").increment(1);
            return Ok(ShortenOutcome::Existing(existing));
        }

        self.create(long_url.to_string(), normalized_url)
            .await
            .map(ShortenOutcome::Created)
    }

    /// Persists a new link for `original_url` under a freshly generated slug.
    ///
    /// `normalized_url` is stored alongside as the de-duplication key; callers
    /// obtain it from [`normalize_url`].
    ///
    /// If the store reports the slug as taken at write time (another request
    /// claimed it between the existence check and the insert), a new slug is
    /// generated and the insert retried. [`AppError::DuplicateSlug`] is never
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn create(
        &self,
        original_url: String,
        normalized_url: String,
    ) -> Result<ShortLink, AppError> {
        loop {
            let slug = self.generate_unique_slug().await?;

            let new_link = NewShortLink {
                slug,
                original_url: original_url.clone(),
                normalized_url: normalized_url.clone(),
            };

            match self.link_repository.insert(new_link).await {
                Ok(link) => {
                    tracing::info!(slug = %link.slug, url = %link.original_url, "Short link created");
                    metrics::counter!("shortlink_links_created_total").increment(1);
                    return Ok(link);
                }
                Err(AppError::DuplicateSlug { slug }) => {
                    tracing::warn!(slug = %slug, "Slug claimed concurrently, regenerating");
                    metrics::counter!("shortlink_slug_conflicts_total").increment(1);
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Draws random slugs until one is not present in the store.
    ///
    /// Every accepted candidate has been checked; a colliding candidate is
    /// replaced and the replacement checked in turn. There is no retry bound.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn generate_unique_slug(&self) -> Result<String, AppError> {
        let mut candidate = random_slug();

        while self.link_repository.exists_slug(&candidate).await? {
            tracing::debug!(slug = %candidate, "Slug collision");
            metrics::counter!("shortlink_slug_collisions_total").increment(1);
            candidate = random_slug();
        }

        Ok(candidate)
    }

    /// Resolves `slug` and counts the visit.
    ///
    /// Returns the record with its counter already incremented.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches the slug.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn visit(&self, slug: &str) -> Result<ShortLink, AppError> {
        let link = self
            .link_repository
            .increment_visit(slug)
            .await?
            .ok_or_else(|| AppError::slug_not_found(slug))?;

        metrics::counter!("shortlink_visits_total").increment(1);
        Ok(link)
    }

    /// Returns the record for `slug` without counting a visit.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link matches the slug.
    /// Returns [`AppError::Internal`] on storage errors.
    pub async fn stats(&self, slug: &str) -> Result<ShortLink, AppError> {
        self.link_repository
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::slug_not_found(slug))
    }

    /// Returns true if the underlying store is reachable.
    pub async fn storage_healthy(&self) -> bool {
        self.link_repository.health_check().await
    }

    /// Path under which `slug` is served, e.g. `/urls/aB3xY9/`.
    pub fn short_path(&self, slug: &str) -> String {
        format!("/urls/{}/", slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockLinkRepository;
    use crate::utils::slug_generator::is_valid_slug;
    use chrono::Utc;
    use serde_json::json;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn create_test_link(id: i64, slug: &str, url: &str, visitor_count: i64) -> ShortLink {
        ShortLink::new(
            id,
            slug.to_string(),
            url.to_string(),
            url.to_string(),
            visitor_count,
            Utc::now(),
        )
    }

    fn stored(new_link: NewShortLink) -> ShortLink {
        ShortLink::new(
            1,
            new_link.slug,
            new_link.original_url,
            new_link.normalized_url,
            0,
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_shorten_creates_new_link() {
        let mut mock_repo = MockLinkRepository::new();

        mock_repo
            .expect_find_by_url()
            .withf(|url| url == "https://a.test/")
            .times(1)
            .returning(|_| Ok(None));
        mock_repo
            .expect_exists_slug()
            .times(1)
            .returning(|_| Ok(false));
        mock_repo
            .expect_insert()
            .withf(|new_link| {
                is_valid_slug(&new_link.slug)
                    && new_link.original_url == "https://a.test"
                    && new_link.normalized_url == "https://a.test/"
            })
            .times(1)
            .returning(|new_link| Ok(stored(new_link)));

        let service = LinkService::new(Arc::new(mock_repo));

        let outcome = service.shorten("https://a.test").await.unwrap();

        assert!(outcome.is_created());
        assert_eq!(outcome.link().original_url, "https://a.test");
        assert_eq!(outcome.link().visitor_count, 0);
        assert!(is_valid_slug(&outcome.link().slug));
    }

    #[tokio::test]
    async fn test_shorten_returns_existing_without_creating() {
        let mut mock_repo = MockLinkRepository::new();

        let existing = create_test_link(5, "exist1", "https://a.test/", 7);
        mock_repo
            .expect_find_by_url()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        mock_repo.expect_exists_slug().times(0);
        mock_repo.expect_insert().times(0);

        let service = LinkService::new(Arc::new(mock_repo));

        let outcome = service.shorten("https://A.TEST").await.unwrap();

        assert!(!outcome.is_created());
        assert_eq!(outcome.link().slug, "exist1");
        assert_eq!(outcome.link().id, 5);
    }

    #[tokio::test]
    async fn test_shorten_invalid_url() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo.expect_find_by_url().times(0);
        mock_repo.expect_insert().times(0);

        let service = LinkService::new(Arc::new(mock_repo));

        for input in ["not-a-url", "javascript:alert(1)", ""] {
            let err = service.shorten(input).await.unwrap_err();
            match err {
                AppError::Validation { details, .. } => {
                    assert_eq!(details, json!({ "url": [INVALID_URL_MESSAGE] }));
                }
                other => panic!("expected validation error, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_generate_unique_slug_rebinds_on_collision() {
        let mut mock_repo = MockLinkRepository::new();
        let checked = Arc::new(Mutex::new(Vec::<String>::new()));

        let log = Arc::clone(&checked);
        mock_repo
            .expect_exists_slug()
            .times(3)
            .returning(move |slug| {
                let mut log = log.lock().unwrap();
                log.push(slug.to_string());
                Ok(log.len() < 3)
            });

        let service = LinkService::new(Arc::new(mock_repo));

        let slug = service.generate_unique_slug().await.unwrap();

        let checked = checked.lock().unwrap();
        assert_eq!(checked.len(), 3);
        // The accepted slug is the last candidate checked.
        assert_eq!(&slug, checked.last().unwrap());
        assert!(is_valid_slug(&slug));
    }

    #[tokio::test]
    async fn test_create_retries_on_duplicate_slug() {
        let mut mock_repo = MockLinkRepository::new();
        let attempts = Arc::new(AtomicUsize::new(0));

        mock_repo
            .expect_exists_slug()
            .times(2)
            .returning(|_| Ok(false));
        let counter = Arc::clone(&attempts);
        mock_repo
            .expect_insert()
            .times(2)
            .returning(move |new_link| {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(AppError::DuplicateSlug {
                        slug: new_link.slug,
                    })
                } else {
                    Ok(stored(new_link))
                }
            });

        let service = LinkService::new(Arc::new(mock_repo));

        let link = service
            .create(
                "https://race.test/".to_string(),
                "https://race.test/".to_string(),
            )
            .await
            .unwrap();

        assert_eq!(link.original_url, "https://race.test/");
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_create_propagates_storage_errors() {
        let mut mock_repo = MockLinkRepository::new();

        mock_repo
            .expect_exists_slug()
            .times(1)
            .returning(|_| Ok(false));
        mock_repo
            .expect_insert()
            .times(1)
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let service = LinkService::new(Arc::new(mock_repo));

        let err = service
            .create(
                "https://down.test/".to_string(),
                "https://down.test/".to_string(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Internal { .. }));
    }

    #[tokio::test]
    async fn test_visit_returns_incremented_link() {
        let mut mock_repo = MockLinkRepository::new();

        mock_repo
            .expect_increment_visit()
            .withf(|slug| slug == "abc123")
            .times(1)
            .returning(|slug| Ok(Some(create_test_link(1, slug, "https://a.test/", 4))));
        mock_repo.expect_find_by_slug().times(0);

        let service = LinkService::new(Arc::new(mock_repo));

        let link = service.visit("abc123").await.unwrap();
        assert_eq!(link.visitor_count, 4);
    }

    #[tokio::test]
    async fn test_visit_not_found() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_increment_visit()
            .times(1)
            .returning(|_| Ok(None));

        let service = LinkService::new(Arc::new(mock_repo));

        let err = service.visit("nope00").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
        assert_eq!(err.to_string(), "Short url id does not exist.");
    }

    #[tokio::test]
    async fn test_stats_does_not_increment() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_find_by_slug()
            .times(1)
            .returning(|slug| Ok(Some(create_test_link(1, slug, "https://a.test/", 3))));
        mock_repo.expect_increment_visit().times(0);

        let service = LinkService::new(Arc::new(mock_repo));

        let link = service.stats("abc123").await.unwrap();
        assert_eq!(link.visitor_count, 3);
    }

    #[tokio::test]
    async fn test_stats_not_found() {
        let mut mock_repo = MockLinkRepository::new();
        mock_repo
            .expect_find_by_slug()
            .times(1)
            .returning(|_| Ok(None));

        let service = LinkService::new(Arc::new(mock_repo));

        let err = service.stats("nope00").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[test]
    fn test_short_path() {
        let service = LinkService::new(Arc::new(MockLinkRepository::new()));
        assert_eq!(service.short_path("aB3xY9"), "/urls/aB3xY9/");
    }
}
