pub mod access;
pub mod config;
pub mod feed;
pub mod user;

pub use access::{AccessEvent, AccessRow, RecentAccessRows, UNKNOWN_ATTRIBUTE};
pub use config::{CacheConfig, ChannelConfig, Config, FeedConfig, LoggingConfig};
pub use feed::{FeedRecord, FeedResponse};
pub use user::{Availability, LatestUserState, UserDraft, UserEvent, UserState};
