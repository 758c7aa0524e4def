//! Read-side orchestration: cache, store, and on-demand ingestion.

use std::sync::Arc;

use insights_core::{validate_page_id, ValidationError};
use insights_db::{DbError, DeletedCounts, PageRow};
use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;

use crate::cache::{page_key, CacheLayer};
use crate::ingest::{IngestError, Ingestor};
use crate::summary::SummaryGenerator;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("page {0} not found")]
    NotFound(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Ingest(IngestError),

    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<IngestError> for ServiceError {
    fn from(error: IngestError) -> Self {
        match error {
            IngestError::InvalidPageId(e) => Self::Validation(e),
            IngestError::Missing(page_id) => Self::NotFound(page_id),
            other => Self::Ingest(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SummaryStats {
    pub followers: i64,
    pub posts: u64,
    pub employees: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSummary {
    pub page_id: String,
    pub page_name: String,
    pub ai_summary: String,
    pub stats: SummaryStats,
}

/// Page lookups backed by the cache, the store, and the ingestion pipeline.
#[derive(Clone)]
pub struct PageService {
    pool: PgPool,
    ingestor: Arc<Ingestor>,
    cache: CacheLayer,
    summarizer: Arc<dyn SummaryGenerator>,
}

impl PageService {
    #[must_use]
    pub fn new(
        pool: PgPool,
        ingestor: Arc<Ingestor>,
        cache: CacheLayer,
        summarizer: Arc<dyn SummaryGenerator>,
    ) -> Self {
        Self {
            pool,
            ingestor,
            cache,
            summarizer,
        }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    #[must_use]
    pub fn cache(&self) -> &CacheLayer {
        &self.cache
    }

    /// Resolve a page: cached copy, then stored row, then a fresh ingestion.
    /// Whatever is found below the cache is written back to it once.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] for a malformed id,
    /// [`ServiceError::Ingest`] when the page had to be scraped and that
    /// failed, or [`ServiceError::Db`] on store failure.
    pub async fn get_page(&self, page_id: &str) -> Result<PageRow, ServiceError> {
        validate_page_id(page_id)?;
        let key = page_key(page_id);

        if let Some(page) = self.cache.get::<PageRow>(&key).await {
            return Ok(page);
        }

        let page = match insights_db::get_page(&self.pool, page_id).await? {
            Some(page) => page,
            None => {
                tracing::info!(page_id, "page not stored; ingesting");
                self.ingestor.ingest(page_id).await?
            }
        };

        self.cache.set(&key, &page).await;
        Ok(page)
    }

    /// Re-ingest unconditionally and drop the cached copy.
    ///
    /// # Errors
    ///
    /// See [`PageService::get_page`].
    pub async fn refresh_page(&self, page_id: &str) -> Result<PageRow, ServiceError> {
        validate_page_id(page_id)?;
        let page = self.ingestor.ingest(page_id).await?;
        self.cache.delete(&page_key(page_id)).await;
        Ok(page)
    }

    /// Delete the page with its posts and employees, then drop the cached copy.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] when no such page is stored.
    pub async fn delete_page(&self, page_id: &str) -> Result<DeletedCounts, ServiceError> {
        validate_page_id(page_id)?;
        let deleted = insights_db::delete_page_cascade(&self.pool, page_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(page_id.to_string()))?;
        self.cache.delete(&page_key(page_id)).await;
        tracing::info!(
            page_id,
            posts = deleted.posts,
            users = deleted.users,
            "page deleted"
        );
        Ok(deleted)
    }

    /// Counts plus generated narrative for a stored page. Never ingests.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] when no such page is stored.
    pub async fn page_summary(&self, page_id: &str) -> Result<PageSummary, ServiceError> {
        validate_page_id(page_id)?;
        let page = insights_db::get_page(&self.pool, page_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(page_id.to_string()))?;

        let posts = insights_db::count_posts_for_page(&self.pool, page_id).await?;
        let employees = insights_db::count_users_for_page(&self.pool, page_id).await?;
        let ai_summary = self
            .summarizer
            .generate_summary(&page, posts, employees)
            .await;

        Ok(PageSummary {
            stats: SummaryStats {
                followers: page.total_followers,
                posts,
                employees,
            },
            page_id: page.page_id,
            page_name: page.page_name,
            ai_summary,
        })
    }
}

#[cfg(test)]
#[path = "query_test.rs"]
mod tests;
