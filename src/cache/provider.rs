//! Cache-or-compute access to named datasets.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use super::config::CacheConfig;
use super::store::CacheStore;

const METRIC_CACHE_HIT: &str = "blogsite_cache_hit_total";
const METRIC_CACHE_MISS: &str = "blogsite_cache_miss_total";
const METRIC_CACHE_STORE_ERROR: &str = "blogsite_cache_store_error_total";

/// Memoizes dataset computations in a [`CacheStore`] for a bounded time.
///
/// Population takes no lock: concurrent misses on one name each compute and
/// the last write wins. Store failures degrade to recomputation instead of
/// failing the caller.
#[derive(Clone)]
pub struct CachedDataProvider {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl CachedDataProvider {
    pub fn new(store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn from_config(store: Arc<dyn CacheStore>, config: &CacheConfig) -> Self {
        Self::new(store, config.ttl())
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the live value stored under `name`, or run `compute` and store its result.
    ///
    /// A failing `compute` propagates its error and leaves the store untouched.
    pub async fn get_or_compute<T, E, F, Fut>(&self, name: &str, compute: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        match self.store.get(name).await {
            Ok(Some(stored)) => match serde_json::from_value::<T>(stored) {
                Ok(value) => {
                    counter!(METRIC_CACHE_HIT, "dataset" => name.to_owned()).increment(1);
                    debug!(target = "blogsite::cache", dataset = name, "cache hit");
                    return Ok(value);
                }
                Err(err) => {
                    counter!(METRIC_CACHE_STORE_ERROR, "dataset" => name.to_owned()).increment(1);
                    warn!(
                        target = "blogsite::cache",
                        dataset = name,
                        error = %err,
                        "cached value has an unexpected shape; recomputing"
                    );
                }
            },
            Ok(None) => {}
            Err(err) => {
                counter!(METRIC_CACHE_STORE_ERROR, "dataset" => name.to_owned()).increment(1);
                warn!(
                    target = "blogsite::cache",
                    dataset = name,
                    error = %err,
                    "cache read failed; treating as miss"
                );
            }
        }

        counter!(METRIC_CACHE_MISS, "dataset" => name.to_owned()).increment(1);
        let value = compute().await?;

        let written = match serde_json::to_value(&value) {
            Ok(encoded) => self.store.set(name, encoded, self.ttl).await,
            Err(err) => Err(err.into()),
        };
        if let Err(err) = written {
            counter!(METRIC_CACHE_STORE_ERROR, "dataset" => name.to_owned()).increment(1);
            warn!(
                target = "blogsite::cache",
                dataset = name,
                error = %err,
                "cache write failed; serving computed value uncached"
            );
        } else {
            debug!(
                target = "blogsite::cache",
                dataset = name,
                ttl_seconds = self.ttl.as_secs(),
                "cache populated"
            );
        }

        Ok(value)
    }
}
