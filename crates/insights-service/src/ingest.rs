//! The page ingestion pipeline.

use std::sync::Arc;

use insights_core::{validate_page_id, ValidationError};
use insights_db::{DbError, PageRow};
use insights_scraper::{
    normalize_employee, normalize_post, normalize_profile, DocumentExtractor, ScraperError,
};
use sqlx::PgPool;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    InvalidPageId(#[from] ValidationError),

    #[error("ingestion failed: {0}")]
    Scraper(#[from] ScraperError),

    #[error(transparent)]
    Db(#[from] DbError),

    #[error("page {0} not found after ingestion")]
    Missing(String),
}

/// Fetches, extracts, validates, and upserts everything known about a page.
///
/// Steps run strictly in order: profile, posts, employees, then a re-read of
/// the stored page. Each record is its own upsert; a failure stops the
/// remaining steps but leaves what was already written in place.
pub struct Ingestor {
    pool: PgPool,
    extractor: Arc<dyn DocumentExtractor>,
    max_posts: usize,
    max_employees: usize,
}

impl Ingestor {
    #[must_use]
    pub fn new(
        pool: PgPool,
        extractor: Arc<dyn DocumentExtractor>,
        max_posts: usize,
        max_employees: usize,
    ) -> Self {
        Self {
            pool,
            extractor,
            max_posts,
            max_employees,
        }
    }

    /// Run the full pipeline for `page_id` and return the stored page.
    ///
    /// # Errors
    ///
    /// - [`IngestError::InvalidPageId`] before anything is fetched.
    /// - [`IngestError::Scraper`] when a document cannot be fetched or an
    ///   extracted record fails validation.
    /// - [`IngestError::Db`] on store failure.
    /// - [`IngestError::Missing`] if the page is gone when re-read.
    pub async fn ingest(&self, page_id: &str) -> Result<PageRow, IngestError> {
        validate_page_id(page_id)?;
        tracing::info!(page_id, policy = %self.extractor.policy(), "ingesting page");

        match self.run(page_id).await {
            Ok(page) => {
                tracing::info!(page_id, followers = page.total_followers, "page ingested");
                Ok(page)
            }
            Err(e) => {
                tracing::error!(page_id, error = %e, "page ingestion failed");
                Err(e)
            }
        }
    }

    async fn run(&self, page_id: &str) -> Result<PageRow, IngestError> {
        let profile = self.extractor.extract_profile(page_id).await?;
        let page = normalize_profile(page_id, profile)?;
        insights_db::upsert_page(&self.pool, &page).await?;
        tracing::info!(page_id, "profile stored");

        let posts = self
            .extractor
            .extract_posts(page_id, self.max_posts)
            .await?;
        let post_count = posts.len();
        for (index, post) in posts.into_iter().take(self.max_posts).enumerate() {
            let record = normalize_post(page_id, index, post)?;
            insights_db::upsert_post(&self.pool, &record).await?;
        }
        tracing::info!(
            page_id,
            count = post_count.min(self.max_posts),
            "posts stored"
        );

        let employees = self
            .extractor
            .extract_employees(page_id, self.max_employees)
            .await?;
        let employee_count = employees.len();
        for (index, employee) in employees.into_iter().take(self.max_employees).enumerate() {
            let record = normalize_employee(page_id, index, employee)?;
            insights_db::upsert_user(&self.pool, &record).await?;
        }
        tracing::info!(
            page_id,
            count = employee_count.min(self.max_employees),
            "employees stored"
        );

        insights_db::get_page(&self.pool, page_id)
            .await?
            .ok_or_else(|| IngestError::Missing(page_id.to_string()))
    }
}

#[cfg(test)]
#[path = "ingest_test.rs"]
mod tests;
