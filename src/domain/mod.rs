//! Domain layer for the Clave console
//!
//! Event models, the latest-state view and the feed port.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult, FeedError, FeedErrorKind};
