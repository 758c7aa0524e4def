use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::Client;

use crate::error::ScraperError;

/// Characters escaped when a page id is placed in a URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// The three public documents a company page exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Profile,
    Posts,
    People,
}

impl DocumentKind {
    fn suffix(self) -> &'static str {
        match self {
            Self::Profile => "",
            Self::Posts => "posts/",
            Self::People => "people/",
        }
    }
}

/// HTTP client for a company page's public documents.
///
/// One attempt per document: anything other than `200 OK` is an error and
/// nothing is retried.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    base_url: String,
}

impl PageFetcher {
    /// Creates a `PageFetcher` with the given request timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] if `base_url` is not an absolute
    /// URL, or [`ScraperError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ScraperError> {
        let trimmed = base_url.trim_end_matches('/');
        reqwest::Url::parse(trimmed).map_err(|e| ScraperError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            base_url: trimmed.to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of one of a page's documents, e.g. `{base}/company/{id}/posts/`.
    #[must_use]
    pub fn document_url(&self, page_id: &str, kind: DocumentKind) -> String {
        document_url(&self.base_url, page_id, kind)
    }

    /// Fetches a page document and returns its body.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::UnexpectedStatus`] for any status other than 200.
    /// - [`ScraperError::Http`] for network, TLS, or timeout failures.
    pub async fn fetch(&self, page_id: &str, kind: DocumentKind) -> Result<String, ScraperError> {
        let url = self.document_url(page_id, kind);
        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status != reqwest::StatusCode::OK {
            tracing::warn!(page_id, %url, status = status.as_u16(), "page document fetch rejected");
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let body = response.text().await?;
        tracing::debug!(page_id, %url, bytes = body.len(), "page document fetched");
        Ok(body)
    }
}

pub(crate) fn document_url(base_url: &str, page_id: &str, kind: DocumentKind) -> String {
    let encoded = utf8_percent_encode(page_id, PATH_SEGMENT);
    format!("{base_url}/company/{encoded}/{}", kind.suffix())
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
