//! Feed client port.

use async_trait::async_trait;

use crate::domain::errors::FeedError;
use crate::domain::models::{ChannelConfig, FeedRecord, UserDraft};

/// Access to the append-only channels of the data-logging service.
///
/// Implementations perform I/O only. Interpreting records is left to the
/// caller, and no call is retried.
#[async_trait]
pub trait FeedClient: Send + Sync {
    /// Fetch up to `limit` of the most recent records of a channel.
    async fn fetch_feed(
        &self,
        channel: &ChannelConfig,
        limit: usize,
    ) -> Result<Vec<FeedRecord>, FeedError>;

    /// Append one user-state event to a channel.
    async fn submit_user_event(
        &self,
        channel: &ChannelConfig,
        draft: &UserDraft,
    ) -> Result<(), FeedError>;
}
