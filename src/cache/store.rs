//! Cache storage implementations.
//!
//! Values are stored as JSON so any serializable dataset fits one store.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use lru::LruCache;
use serde_json::Value;
use thiserror::Error;
use time::OffsetDateTime;

use crate::application::clock::Clock;

use super::config::CacheConfig;
use super::lock::{rw_read, rw_write};

const SOURCE: &str = "cache::store";

#[derive(Debug, Error)]
pub enum CacheStoreError {
    #[error("cache store unavailable: {0}")]
    Unavailable(String),
    #[error("cached value could not be encoded or decoded: {0}")]
    Codec(#[from] serde_json::Error),
}

impl CacheStoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}

/// Key-value store with per-entry expiration.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns the stored value unless it is absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Value>, CacheStoreError>;

    async fn set(&self, key: &str, value: Value, ttl: Duration) -> Result<(), CacheStoreError>;
}

struct Entry {
    value: Value,
    expires_at: OffsetDateTime,
}

/// In-process store bounded by LRU eviction.
pub struct MemoryCacheStore {
    entries: RwLock<LruCache<String, Entry>>,
    clock: Arc<dyn Clock>,
}

impl MemoryCacheStore {
    pub fn new(config: &CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(LruCache::new(config.entry_limit_non_zero())),
            clock,
        }
    }

    /// Number of entries held, expired ones included until they are next read.
    pub fn len(&self) -> usize {
        rw_read(&self.entries, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        rw_write(&self.entries, SOURCE, "clear").clear();
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, CacheStoreError> {
        let now = self.clock.now();
        let mut entries = rw_write(&self.entries, SOURCE, "get");

        match entries.get(key) {
            None => return Ok(None),
            Some(entry) if entry.expires_at > now => return Ok(Some(entry.value.clone())),
            Some(_) => {}
        }

        entries.pop(key);
        Ok(None)
    }

    async fn set(&self, key: &str, value: Value, ttl: Duration) -> Result<(), CacheStoreError> {
        let now = self.clock.now();
        let expires_at = time::Duration::try_from(ttl)
            .ok()
            .and_then(|ttl| now.checked_add(ttl))
            .ok_or_else(|| {
                CacheStoreError::unavailable(format!("ttl of {}s is out of range", ttl.as_secs()))
            })?;
        rw_write(&self.entries, SOURCE, "set").put(key.to_string(), Entry { value, expires_at });
        Ok(())
    }
}

/// Store used when caching is switched off: every read misses, writes are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledCacheStore;

#[async_trait]
impl CacheStore for DisabledCacheStore {
    async fn get(&self, _key: &str) -> Result<Option<Value>, CacheStoreError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: Value, _ttl: Duration) -> Result<(), CacheStoreError> {
        Ok(())
    }
}
