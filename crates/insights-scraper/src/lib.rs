//! Fetching and extraction of public company pages.
//!
//! The [`DocumentExtractor`] trait is the only thing ingestion depends on.
//! [`HtmlExtractor`] fetches the three public documents of a page with
//! [`PageFetcher`] and applies best-effort field rules; [`PlaceholderExtractor`]
//! fabricates deterministic records for environments that must not scrape.

pub mod client;
mod document;
pub mod error;
pub mod extractor;
pub mod html;
pub mod normalize;
pub mod placeholder;
mod rules;

use std::sync::Arc;

use insights_core::{AppConfig, ExtractionPolicy};

pub use client::{DocumentKind, PageFetcher};
pub use error::ScraperError;
pub use extractor::{
    DocumentExtractor, ExtractedComment, ExtractedEmployee, ExtractedPost, ExtractedProfile,
};
pub use html::HtmlExtractor;
pub use normalize::{normalize_employee, normalize_post, normalize_profile};
pub use placeholder::PlaceholderExtractor;

/// Build the extractor selected by `config.extraction_policy`.
///
/// # Errors
///
/// Returns [`ScraperError`] if the HTTP client for the HTML policy cannot be
/// constructed.
pub fn build_extractor(config: &AppConfig) -> Result<Arc<dyn DocumentExtractor>, ScraperError> {
    let extractor: Arc<dyn DocumentExtractor> = match config.extraction_policy {
        ExtractionPolicy::Html => {
            let fetcher = PageFetcher::new(
                &config.scraper_base_url,
                config.scraper_timeout_secs,
                &config.scraper_user_agent,
            )?;
            Arc::new(HtmlExtractor::new(fetcher))
        }
        ExtractionPolicy::Placeholder => {
            Arc::new(PlaceholderExtractor::new(&config.scraper_base_url))
        }
    };
    tracing::info!(policy = %config.extraction_policy, "document extractor configured");
    Ok(extractor)
}
