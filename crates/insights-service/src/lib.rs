//! Page ingestion, caching, and query orchestration.
//!
//! [`Ingestor`] runs the fetch, extract, validate, upsert pipeline for one
//! page. [`PageService`] sits in front of it with the read-through
//! [`CacheLayer`] and the [`SummaryGenerator`].

pub mod cache;
pub mod ingest;
pub mod query;
pub mod summary;

pub use cache::{page_key, CacheError, CacheLayer, CacheStore, MemoryCacheStore};
pub use ingest::{IngestError, Ingestor};
pub use query::{PageService, PageSummary, ServiceError, SummaryStats};
pub use summary::{OpenAiSummaryGenerator, SummaryGenerator};

#[cfg(test)]
pub(crate) mod test_support;
