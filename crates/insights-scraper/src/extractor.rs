//! The extraction seam between ingestion and whatever produces page data.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use insights_core::ExtractionPolicy;
use serde::Serialize;

use crate::error::ScraperError;

/// Profile fields as found on the page, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedProfile {
    pub page_url: String,
    pub page_name: String,
    pub linkedin_id: Option<String>,
    pub profile_picture_url: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub total_followers: u64,
    pub head_count: Option<u64>,
    pub specialties: Vec<String>,
    pub location: Option<String>,
    pub founded_year: Option<String>,
    pub company_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedComment {
    pub comment_id: Option<String>,
    pub author_name: String,
    pub author_profile_url: Option<String>,
    pub content: String,
    pub posted_at: Option<DateTime<Utc>>,
    pub likes: u64,
}

/// A post as found on the page. `post_id` is `None` when the markup carries
/// no stable identifier; normalization then assigns a positional one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedPost {
    pub post_id: Option<String>,
    pub post_url: String,
    pub content: String,
    pub media_urls: Vec<String>,
    pub likes: u64,
    pub comments_count: u64,
    pub reposts: u64,
    pub posted_at: Option<DateTime<Utc>>,
    pub comments: Vec<ExtractedComment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedEmployee {
    pub user_id: Option<String>,
    pub name: String,
    pub profile_url: String,
    pub profile_picture_url: Option<String>,
    pub headline: Option<String>,
    pub position: Option<String>,
}

/// Produces raw page data for ingestion.
///
/// Implementations decide where the data comes from; callers never branch on
/// which one they hold.
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    fn policy(&self) -> ExtractionPolicy;

    /// # Errors
    ///
    /// Returns [`ScraperError`] when the profile document cannot be obtained.
    async fn extract_profile(&self, page_id: &str) -> Result<ExtractedProfile, ScraperError>;

    /// At most `max_posts` posts, in page order.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError`] when the posts document cannot be obtained.
    async fn extract_posts(
        &self,
        page_id: &str,
        max_posts: usize,
    ) -> Result<Vec<ExtractedPost>, ScraperError>;

    /// At most `max_employees` people, in page order.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError`] when the people document cannot be obtained.
    async fn extract_employees(
        &self,
        page_id: &str,
        max_employees: usize,
    ) -> Result<Vec<ExtractedEmployee>, ScraperError>;
}
