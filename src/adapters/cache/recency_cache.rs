//! Time-boxed memoization of feed pipelines using a moka TTL cache.
//!
//! Values are computed on demand, reused for `ttl`, and dropped early on
//! explicit invalidation. Failed computations are never stored.

use moka::future::Cache;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

/// Default validity window of a cached view.
pub const DEFAULT_TTL_SECS: u64 = 30;

/// Default maximum number of cached entries.
pub const DEFAULT_MAX_CAPACITY: u64 = 64;

/// TTL cache with compute-on-miss semantics.
///
/// Entries are stored under `(generation, key)`. [`invalidate_all`] bumps the
/// generation, so a computation that was already running when the cache was
/// invalidated lands under a stale generation and is never served.
///
/// [`invalidate_all`]: RecencyCache::invalidate_all
pub struct RecencyCache<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    entries: Cache<(u64, K), V>,
    generation: AtomicU64,
    ttl: Duration,
}

impl<K, V> RecencyCache<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Create a cache with the default TTL and capacity.
    pub fn new() -> Self {
        Self::with_ttl(Duration::from_secs(DEFAULT_TTL_SECS), DEFAULT_MAX_CAPACITY)
    }

    /// Create with custom TTL and capacity.
    pub fn with_ttl(ttl: Duration, max_capacity: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();

        Self {
            entries,
            generation: AtomicU64::new(0),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Return the cached value for `key`, or run `compute` and cache its
    /// `Ok` result.
    ///
    /// Concurrent callers missing on the same key share one computation.
    /// An `Err` is handed to every waiting caller and nothing is cached.
    pub async fn get_or_compute<F, E>(&self, key: K, compute: F) -> Result<V, E>
    where
        F: Future<Output = Result<V, E>>,
        E: Clone + Send + Sync + 'static,
    {
        let generation = self.current_generation();
        self.entries
            .try_get_with((generation, key), compute)
            .await
            .map_err(|err| (*err).clone())
    }

    /// Peek at a cached value without computing it.
    #[cfg(test)]
    pub async fn get(&self, key: &K) -> Option<V> {
        let generation = self.current_generation();
        self.entries.get(&(generation, key.clone())).await
    }

    /// Drop the cached value for one key.
    ///
    /// Unlike [`invalidate_all`](Self::invalidate_all) this does not fence a
    /// computation already running for the key.
    pub async fn invalidate(&self, key: &K) {
        let generation = self.current_generation();
        self.entries.invalidate(&(generation, key.clone())).await;
    }

    /// Drop every cached value and fence off in-flight computations.
    pub fn invalidate_all(&self) {
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        self.entries.invalidate_all();
        debug!(generation, "recency cache invalidated");
    }
}

impl<K, V> Default for RecencyCache<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
