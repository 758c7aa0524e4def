use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("extraction task failed: {0}")]
    Extraction(#[from] tokio::task::JoinError),

    #[error("invalid {record} record: {reason}")]
    Normalization { record: String, reason: String },
}
