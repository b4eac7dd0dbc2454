//! ThingSpeak channel adapter.
//!
//! Implements the [`FeedClient`](crate::domain::ports::FeedClient) port on
//! top of the ThingSpeak REST API: one read endpoint per channel feed and a
//! shared update endpoint for appends.

pub mod client;
pub mod models;

pub use client::{ThingSpeakClient, ThingSpeakClientConfig};
