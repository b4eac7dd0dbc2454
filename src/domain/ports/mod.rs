//! Port trait definitions (Hexagonal Architecture)
//!
//! - FeedClient: reads and writes on the upstream data-logging channels
//!
//! The services depend on these traits only, so the HTTP adapter can be
//! swapped for an in-memory fake in tests.

pub mod feed_client;

pub use feed_client::FeedClient;
