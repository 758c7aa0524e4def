//! Extractor and generator doubles shared by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use insights_core::ExtractionPolicy;
use insights_db::PageRow;
use insights_scraper::{
    DocumentExtractor, ExtractedEmployee, ExtractedPost, ExtractedProfile, ScraperError,
};

use crate::summary::SummaryGenerator;

#[derive(Default)]
pub(crate) struct StubExtractor {
    pub(crate) followers: u64,
    pub(crate) posts: usize,
    pub(crate) employees: usize,
    pub(crate) fail_profile: bool,
    pub(crate) fail_posts: bool,
    pub(crate) profile_calls: AtomicUsize,
}

impl StubExtractor {
    pub(crate) fn new(followers: u64, posts: usize, employees: usize) -> Self {
        Self {
            followers,
            posts,
            employees,
            ..Self::default()
        }
    }

    pub(crate) fn profile_calls(&self) -> usize {
        self.profile_calls.load(Ordering::SeqCst)
    }
}

fn upstream_failure(page_id: &str) -> ScraperError {
    ScraperError::UnexpectedStatus {
        status: 503,
        url: format!("https://www.linkedin.com/company/{page_id}/"),
    }
}

#[async_trait]
impl DocumentExtractor for StubExtractor {
    fn policy(&self) -> ExtractionPolicy {
        ExtractionPolicy::Placeholder
    }

    async fn extract_profile(&self, page_id: &str) -> Result<ExtractedProfile, ScraperError> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_profile {
            return Err(upstream_failure(page_id));
        }
        Ok(ExtractedProfile {
            page_url: format!("https://www.linkedin.com/company/{page_id}/"),
            page_name: format!("{page_id} Inc"),
            linkedin_id: None,
            profile_picture_url: None,
            description: Some("Stub company".to_string()),
            website: None,
            industry: Some("Technology".to_string()),
            total_followers: self.followers,
            head_count: None,
            specialties: vec!["testing".to_string()],
            location: None,
            founded_year: None,
            company_type: None,
        })
    }

    async fn extract_posts(
        &self,
        page_id: &str,
        max_posts: usize,
    ) -> Result<Vec<ExtractedPost>, ScraperError> {
        if self.fail_posts {
            return Err(upstream_failure(page_id));
        }
        Ok((0..self.posts.min(max_posts))
            .map(|i| ExtractedPost {
                post_id: None,
                post_url: format!("https://www.linkedin.com/company/{page_id}/posts/"),
                content: format!("post {i}"),
                media_urls: vec![],
                likes: 1,
                comments_count: 0,
                reposts: 0,
                posted_at: None,
                comments: vec![],
            })
            .collect())
    }

    async fn extract_employees(
        &self,
        _page_id: &str,
        max_employees: usize,
    ) -> Result<Vec<ExtractedEmployee>, ScraperError> {
        Ok((0..self.employees.min(max_employees))
            .map(|i| ExtractedEmployee {
                user_id: None,
                name: format!("Employee {i}"),
                profile_url: String::new(),
                profile_picture_url: None,
                headline: None,
                position: None,
            })
            .collect())
    }
}

/// Echoes its inputs so tests can see what the service passed in.
pub(crate) struct EchoSummary;

#[async_trait]
impl SummaryGenerator for EchoSummary {
    async fn generate_summary(
        &self,
        page: &PageRow,
        posts_count: u64,
        employees_count: u64,
    ) -> String {
        format!("{}: {posts_count} posts, {employees_count} employees", page.page_name)
    }
}
