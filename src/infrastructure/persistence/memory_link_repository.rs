//! In-memory implementation of link repository.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// Process-local link store backed by [`DashMap`].
///
/// Records live in a slug-keyed map; the entry API makes the slug check and the
/// insert one step, and `get_mut` holds the shard lock across the counter
/// increment. A secondary index keeps the first slug issued for each
/// canonical URL.
///
/// Data is lost when the process exits.
#[derive(Debug, Default)]
pub struct InMemoryLinkRepository {
    links: DashMap<String, ShortLink>,
    by_url: DashMap<String, String>,
    next_id: AtomicI64,
}

impl InMemoryLinkRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored links.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<ShortLink>, AppError> {
        Ok(self.links.get(slug).map(|entry| entry.value().clone()))
    }

    async fn find_by_url(&self, normalized_url: &str) -> Result<Option<ShortLink>, AppError> {
        let Some(slug) = self.by_url.get(normalized_url).map(|e| e.value().clone()) else {
            return Ok(None);
        };

        self.find_by_slug(&slug).await
    }

    async fn exists_slug(&self, slug: &str) -> Result<bool, AppError> {
        Ok(self.links.contains_key(slug))
    }

    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let link = match self.links.entry(new_link.slug.clone()) {
            Entry::Occupied(_) => {
                return Err(AppError::DuplicateSlug {
                    slug: new_link.slug,
                });
            }
            Entry::Vacant(vacant) => {
                let link = ShortLink::new(
                    self.next_id.fetch_add(1, Ordering::Relaxed) + 1,
                    new_link.slug,
                    new_link.original_url,
                    new_link.normalized_url,
                    0,
                    Utc::now(),
                );
                vacant.insert(link.clone());
                link
            }
        };

        self.by_url
            .entry(link.normalized_url.clone())
            .or_insert_with(|| link.slug.clone());

        Ok(link)
    }

    async fn increment_visit(&self, slug: &str) -> Result<Option<ShortLink>, AppError> {
        let Some(mut entry) = self.links.get_mut(slug) else {
            return Ok(None);
        };

        entry.visitor_count += 1;
        Ok(Some(entry.value().clone()))
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    fn new_link(slug: &str, url: &str) -> NewShortLink {
        NewShortLink {
            slug: slug.to_string(),
            original_url: url.to_string(),
            normalized_url: url.to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = InMemoryLinkRepository::new();

        let created = repo
            .insert(new_link("abc123", "https://example.com/"))
            .await
            .unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.visitor_count, 0);

        let by_slug = repo.find_by_slug("abc123").await.unwrap().unwrap();
        assert_eq!(by_slug, created);

        let by_url = repo
            .find_by_url("https://example.com/")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_url.slug, "abc123");

        assert!(repo.exists_slug("abc123").await.unwrap());
        assert!(!repo.exists_slug("zzz999").await.unwrap());
    }

    #[tokio::test]
    async fn test_find_missing() {
        let repo = InMemoryLinkRepository::new();

        assert!(repo.find_by_slug("nope00").await.unwrap().is_none());
        assert!(repo.find_by_url("https://none/").await.unwrap().is_none());
        assert!(repo.increment_visit("nope00").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_duplicate_slug() {
        let repo = InMemoryLinkRepository::new();

        repo.insert(new_link("abc123", "https://one.test/"))
            .await
            .unwrap();
        let err = repo
            .insert(new_link("abc123", "https://two.test/"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::DuplicateSlug { ref slug } if slug == "abc123"));
        assert_eq!(repo.len(), 1);
        assert_eq!(
            repo.find_by_slug("abc123").await.unwrap().unwrap().original_url,
            "https://one.test/"
        );
    }

    #[tokio::test]
    async fn test_url_index_keeps_first_slug() {
        let repo = InMemoryLinkRepository::new();

        repo.insert(new_link("first1", "https://same.test/"))
            .await
            .unwrap();
        repo.insert(new_link("second", "https://same.test/"))
            .await
            .unwrap();

        let found = repo
            .find_by_url("https://same.test/")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.slug, "first1");
    }

    #[tokio::test]
    async fn test_url_index_uses_normalized_form() {
        let repo = InMemoryLinkRepository::new();
        repo.insert(NewShortLink {
            slug: "norm01".to_string(),
            original_url: "HTTPS://Example.com".to_string(),
            normalized_url: "https://example.com/".to_string(),
        })
        .await
        .unwrap();

        let found = repo
            .find_by_url("https://example.com/")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.original_url, "HTTPS://Example.com");
        assert!(repo.find_by_url("HTTPS://Example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_increment_visit() {
        let repo = InMemoryLinkRepository::new();
        repo.insert(new_link("abc123", "https://example.com/"))
            .await
            .unwrap();

        let first = repo.increment_visit("abc123").await.unwrap().unwrap();
        let second = repo.increment_visit("abc123").await.unwrap().unwrap();

        assert_eq!(first.visitor_count, 1);
        assert_eq!(second.visitor_count, 2);
        assert_eq!(
            repo.find_by_slug("abc123")
                .await
                .unwrap()
                .unwrap()
                .visitor_count,
            2
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_increments_are_not_lost() {
        let repo = Arc::new(InMemoryLinkRepository::new());
        repo.insert(new_link("hot001", "https://hot.test/"))
            .await
            .unwrap();

        let mut handles = vec![];
        for _ in 0..200 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                repo.increment_visit("hot001").await.unwrap().unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let link = repo.find_by_slug("hot001").await.unwrap().unwrap();
        assert_eq!(link.visitor_count, 200);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inserts_same_slug_single_winner() {
        let repo = Arc::new(InMemoryLinkRepository::new());

        let mut handles = vec![];
        for i in 0..50 {
            let repo = Arc::clone(&repo);
            handles.push(tokio::spawn(async move {
                repo.insert(new_link("race01", &format!("https://r{i}.test/")))
                    .await
            }));
        }

        let mut ok = 0;
        let mut dup = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => ok += 1,
                Err(AppError::DuplicateSlug { .. }) => dup += 1,
                Err(e) => panic!("unexpected error: {e}"),
            }
        }

        assert_eq!(ok, 1);
        assert_eq!(dup, 49);
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let repo = InMemoryLinkRepository::new();
        let mut ids = HashSet::new();

        for i in 0..10 {
            let link = repo
                .insert(new_link(&format!("id{i:04}"), &format!("https://{i}.test/")))
                .await
                .unwrap();
            ids.insert(link.id);
        }

        assert_eq!(ids.len(), 10);
    }
}
