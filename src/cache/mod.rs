//! Dataset cache for the blog dashboard.
//!
//! Aggregations that only change once a day are memoized under fixed names
//! with a time-to-live:
//!
//! - [`CacheStore`]: key/value store with per-entry expiry (in-memory LRU by default)
//! - [`CachedDataProvider`]: the single cache-or-compute primitive
//! - [`DatasetKey`]: names of the datasets the home dashboard caches
//!
//! ## Configuration
//!
//! ```toml
//! [cache]
//! enabled = true
//! ttl_seconds = 3600
//! entry_limit = 64
//! ```

mod config;
mod keys;
pub(crate) mod lock;
mod provider;
mod store;

pub use config::CacheConfig;
pub use keys::DatasetKey;
pub use provider::CachedDataProvider;
pub use store::{CacheStore, CacheStoreError, DisabledCacheStore, MemoryCacheStore};
