//! Read-through cache for page records.
//!
//! [`CacheLayer`] is total: a backing-store failure or an undecodable entry
//! is logged and treated as a miss (reads) or a no-op (writes), so a cache
//! outage never changes what a caller gets back.

use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use insights_core::AppConfig;
use lru::LruCache;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache store unavailable: {0}")]
    Unavailable(String),

    #[error("cache TTL {0:?} is out of range")]
    TtlOutOfRange(Duration),

    #[error("cache value could not be encoded: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Key under which a page record is cached.
#[must_use]
pub fn page_key(page_id: &str) -> String {
    format!("page:{page_id}")
}

/// A key-value store with per-entry expiry.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// # Errors
    ///
    /// Returns [`CacheError`] if the store cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// # Errors
    ///
    /// Returns [`CacheError`] if the store cannot be written.
    async fn set_with_ttl(
        &self,
        key: &str,
        value: String,
        ttl: Duration,
    ) -> Result<(), CacheError>;

    /// # Errors
    ///
    /// Returns [`CacheError`] if the store cannot be written.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// # Errors
    ///
    /// Returns [`CacheError`] if the store cannot be read.
    async fn exists(&self, key: &str) -> Result<bool, CacheError>;

    /// Release the store's resources. Later calls fail.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError`] if the store cannot be shut down cleanly.
    async fn close(&self) -> Result<(), CacheError>;
}

struct Entry {
    value: String,
    expires_at: Instant,
}

/// In-process LRU store. Expired entries are dropped when next touched; the
/// least recently used entry is evicted once `capacity` is reached.
pub struct MemoryCacheStore {
    entries: Mutex<LruCache<String, Entry>>,
    closed: AtomicBool,
}

impl MemoryCacheStore {
    #[must_use]
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            closed: AtomicBool::new(false),
        }
    }

    fn with_entries<R>(
        &self,
        f: impl FnOnce(&mut LruCache<String, Entry>) -> R,
    ) -> Result<R, CacheError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(CacheError::Unavailable("store is closed".to_string()));
        }
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| CacheError::Unavailable("store lock poisoned".to_string()))?;
        Ok(f(&mut entries))
    }
}

/// Drop `key` if its entry has expired; returns whether a live entry remains.
fn evict_if_expired(entries: &mut LruCache<String, Entry>, key: &str) -> bool {
    match entries.peek(key) {
        Some(entry) if entry.expires_at <= Instant::now() => {
            entries.pop(key);
            false
        }
        Some(_) => true,
        None => false,
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        self.with_entries(|entries| {
            if evict_if_expired(entries, key) {
                entries.get(key).map(|entry| entry.value.clone())
            } else {
                None
            }
        })
    }

    async fn set_with_ttl(
        &self,
        key: &str,
        value: String,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let expires_at = Instant::now()
            .checked_add(ttl)
            .ok_or(CacheError::TtlOutOfRange(ttl))?;
        self.with_entries(|entries| {
            entries.put(key.to_string(), Entry { value, expires_at });
        })
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.with_entries(|entries| {
            entries.pop(key);
        })
    }

    async fn exists(&self, key: &str) -> Result<bool, CacheError> {
        self.with_entries(|entries| evict_if_expired(entries, key))
    }

    async fn close(&self) -> Result<(), CacheError> {
        self.with_entries(LruCache::clear)?;
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}

/// JSON-encoding, failure-swallowing front for an optional [`CacheStore`].
#[derive(Clone)]
pub struct CacheLayer {
    store: Option<Arc<dyn CacheStore>>,
    ttl: Duration,
}

impl std::fmt::Debug for CacheLayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheLayer")
            .field("enabled", &self.store.is_some())
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl CacheLayer {
    #[must_use]
    pub fn new(store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self {
            store: Some(store),
            ttl,
        }
    }

    /// A layer with no store: every read misses, every write is a no-op.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            store: None,
            ttl: Duration::ZERO,
        }
    }

    /// Build the layer described by `config`: an in-process LRU store when
    /// caching is enabled, otherwise [`CacheLayer::disabled`].
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        if !config.cache_enabled {
            tracing::info!("cache disabled");
            return Self::disabled();
        }
        let Some(capacity) = NonZeroUsize::new(config.cache_max_entries) else {
            tracing::warn!("cache capacity is zero; caching disabled");
            return Self::disabled();
        };
        tracing::info!(
            ttl_secs = config.cache_ttl_secs,
            max_entries = config.cache_max_entries,
            "in-memory cache enabled"
        );
        Self::new(
            Arc::new(MemoryCacheStore::new(capacity)),
            Duration::from_secs(config.cache_ttl_secs),
        )
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let store = self.store.as_ref()?;
        let raw = match store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!(key, "cache miss");
                return None;
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "cache read failed; treating as miss");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => {
                tracing::debug!(key, "cache hit");
                Some(value)
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "cached value undecodable; treating as miss");
                None
            }
        }
    }

    /// Store `value` under `key` with the configured TTL.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) {
        self.set_with_ttl(key, value, self.ttl).await;
    }

    pub async fn set_with_ttl<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        let Some(store) = self.store.as_ref() else {
            return;
        };
        let encoded = match serde_json::to_string(value) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::warn!(key, error = %CacheError::from(e), "cache write skipped");
                return;
            }
        };
        if let Err(e) = store.set_with_ttl(key, encoded, ttl).await {
            tracing::warn!(key, error = %e, "cache write failed");
        }
    }

    pub async fn delete(&self, key: &str) {
        let Some(store) = self.store.as_ref() else {
            return;
        };
        if let Err(e) = store.delete(key).await {
            tracing::warn!(key, error = %e, "cache delete failed");
        }
    }

    pub async fn exists(&self, key: &str) -> bool {
        let Some(store) = self.store.as_ref() else {
            return false;
        };
        store.exists(key).await.unwrap_or_else(|e| {
            tracing::warn!(key, error = %e, "cache existence check failed");
            false
        })
    }

    /// Shut the backing store down; called once at process shutdown.
    pub async fn close(&self) {
        if let Some(store) = self.store.as_ref() {
            if let Err(e) = store.close().await {
                tracing::warn!(error = %e, "cache close failed");
            }
        }
    }
}

#[cfg(test)]
#[path = "cache_test.rs"]
mod tests;
