//! In-memory caching layer for feed-backed views.
//!
//! Uses `moka` for TTL-based concurrent caching with explicit
//! invalidation by the component that issues writes.

pub mod recency_cache;

pub use recency_cache::RecencyCache;
