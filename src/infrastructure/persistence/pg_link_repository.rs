//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::db_error::is_unique_violation_on_slug;

/// PostgreSQL repository for short links.
///
/// Slug uniqueness is enforced by the `short_links_slug_key` constraint and the
/// visit counter is bumped with a single `UPDATE ... RETURNING`, so neither
/// relies on a prior read.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<ShortLink>, AppError> {
        let link = sqlx::query_as::<_, ShortLink>(
            r#"
            SELECT id, slug, original_url, normalized_url, visitor_count, created_time
            FROM short_links
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn find_by_url(&self, normalized_url: &str) -> Result<Option<ShortLink>, AppError> {
        let link = sqlx::query_as::<_, ShortLink>(
            r#"
            SELECT id, slug, original_url, normalized_url, visitor_count, created_time
            FROM short_links
            WHERE normalized_url = $1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(normalized_url)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn exists_slug(&self, slug: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM short_links WHERE slug = $1)")
                .bind(slug)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(exists)
    }

    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        sqlx::query_as::<_, ShortLink>(
            r#"
            INSERT INTO short_links (slug, original_url, normalized_url)
            VALUES ($1, $2, $3)
            RETURNING id, slug, original_url, normalized_url, visitor_count, created_time
            "#,
        )
        .bind(&new_link.slug)
        .bind(&new_link.original_url)
        .bind(&new_link.normalized_url)
        .fetch_one(self.pool.as_ref())
        .await
        .map_err(|e| {
            if is_unique_violation_on_slug(&e) {
                AppError::DuplicateSlug {
                    slug: new_link.slug.clone(),
                }
            } else {
                e.into()
            }
        })
    }

    async fn increment_visit(&self, slug: &str) -> Result<Option<ShortLink>, AppError> {
        let link = sqlx::query_as::<_, ShortLink>(
            r#"
            UPDATE short_links
            SET visitor_count = visitor_count + 1
            WHERE slug = $1
            RETURNING id, slug, original_url, normalized_url, visitor_count, created_time
            "#,
        )
        .bind(slug)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(link)
    }

    async fn health_check(&self) -> bool {
        match sqlx::query("SELECT 1").execute(self.pool.as_ref()).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!("Database health check failed: {}", e);
                false
            }
        }
    }
}
