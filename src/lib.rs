//! Clave - Kiosk access administration console
//!
//! Clave manages the user directory and access log of a badge kiosk whose
//! state lives in two append-only ThingSpeak channels. User changes are
//! appended as events; the current directory is the latest event per user.
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Records, events, derived state and the feed port
//! - **Adapter Layer** (`adapters`): ThingSpeak HTTP client and the recency cache
//! - **Service Layer** (`services`): Latest-state reduction and the directory service
//! - **Infrastructure Layer** (`infrastructure`): Configuration and logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use clave::cli::{build_directory, load_config};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = load_config(None)?;
//!     let directory = build_directory(&config)?;
//!     for user in directory.latest_user_state().await.iter() {
//!         println!("{} {}", user.user_id, user.available);
//!     }
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use adapters::cache::RecencyCache;
pub use adapters::thingspeak::{ThingSpeakClient, ThingSpeakClientConfig};
pub use domain::errors::{DomainError, DomainResult, FeedError, FeedErrorKind};
pub use domain::models::{
    AccessEvent, AccessRow, Availability, CacheConfig, ChannelConfig, Config, FeedConfig,
    FeedRecord, LatestUserState, LoggingConfig, RecentAccessRows, UserDraft, UserEvent, UserState,
};
pub use domain::ports::FeedClient;
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{DirectoryService, DirectorySettings};
