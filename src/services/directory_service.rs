//! User directory service.
//!
//! Owns the feed client, the two cached read pipelines (latest user state
//! and recent accesses) and the write path. Because it is the only component
//! that writes, it is also the one that invalidates the cache.

use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::adapters::cache::RecencyCache;
use crate::domain::errors::{DomainError, DomainResult, FeedError};
use crate::domain::models::{
    AccessEvent, Availability, CacheConfig, ChannelConfig, FeedConfig, LatestUserState,
    RecentAccessRows, UserDraft, UserState,
};
use crate::domain::ports::FeedClient;

use super::reducer;

/// Settings the directory needs from the feed configuration.
#[derive(Debug, Clone)]
pub struct DirectorySettings {
    pub users_channel: ChannelConfig,
    pub accesses_channel: ChannelConfig,
    pub user_fetch_limit: usize,
    pub cache_ttl: Duration,
    pub cache_capacity: u64,
}

impl DirectorySettings {
    pub fn from_config(feed: &FeedConfig, cache: &CacheConfig) -> Self {
        Self {
            users_channel: feed.users.clone(),
            accesses_channel: feed.accesses.clone(),
            user_fetch_limit: feed.user_fetch_limit,
            cache_ttl: Duration::from_secs(cache.ttl_secs),
            cache_capacity: cache.max_capacity,
        }
    }
}

pub struct DirectoryService<C: FeedClient> {
    client: Arc<C>,
    settings: DirectorySettings,
    users: RecencyCache<(), Arc<LatestUserState>>,
    accesses: RecencyCache<usize, Arc<Vec<AccessEvent>>>,
}

impl<C: FeedClient> DirectoryService<C> {
    pub fn new(client: Arc<C>, settings: DirectorySettings) -> Self {
        let users = RecencyCache::with_ttl(settings.cache_ttl, settings.cache_capacity);
        let accesses = RecencyCache::with_ttl(settings.cache_ttl, settings.cache_capacity);
        Self {
            client,
            settings,
            users,
            accesses,
        }
    }

    /// Latest state of every user, newest first, surfacing feed failures.
    pub async fn try_latest_user_state(&self) -> DomainResult<Arc<LatestUserState>> {
        let state = self
            .users
            .get_or_compute((), async {
                let records = self
                    .client
                    .fetch_feed(&self.settings.users_channel, self.settings.user_fetch_limit)
                    .await?;
                let events = reducer::user_events_from_records(&records);
                Ok::<_, FeedError>(Arc::new(reducer::latest_user_state(events)))
            })
            .await?;
        Ok(state)
    }

    /// Latest state of every user; empty when the feed cannot be read.
    pub async fn latest_user_state(&self) -> Arc<LatestUserState> {
        match self.try_latest_user_state().await {
            Ok(state) => state,
            Err(err) => {
                warn!(error = %err, "users feed unavailable, showing no users");
                Arc::new(LatestUserState::new())
            }
        }
    }

    /// The `n` most recent access events, newest first, surfacing feed failures.
    pub async fn try_recent_accesses(&self, n: usize) -> DomainResult<Arc<Vec<AccessEvent>>> {
        if n == 0 {
            return Err(DomainError::ValidationFailed(
                "access count must be at least 1".to_string(),
            ));
        }

        let accesses = self
            .accesses
            .get_or_compute(n, async {
                let records = self
                    .client
                    .fetch_feed(&self.settings.accesses_channel, n)
                    .await?;
                let events = reducer::access_events_from_records(&records);
                Ok::<_, FeedError>(Arc::new(reducer::sort_recent(events)))
            })
            .await?;
        Ok(accesses)
    }

    /// The `n` most recent access events; empty when the feed cannot be read.
    pub async fn recent_accesses(&self, n: usize) -> Arc<Vec<AccessEvent>> {
        match self.try_recent_accesses(n).await {
            Ok(accesses) => accesses,
            Err(err) => {
                warn!(error = %err, n, "accesses feed unavailable, showing no accesses");
                Arc::new(Vec::new())
            }
        }
    }

    /// Recent accesses joined with the users they belong to.
    ///
    /// Only an accesses-feed failure fails the view. When the users feed
    /// cannot be read the rows are joined against no users and the failure
    /// kind is reported alongside them.
    pub async fn recent_access_rows(&self, n: usize) -> DomainResult<RecentAccessRows> {
        let accesses = self.try_recent_accesses(n).await?;

        let (users, users_unavailable) = match self.try_latest_user_state().await {
            Ok(users) => (users, None),
            Err(DomainError::Feed(err)) => {
                warn!(error = %err, "users feed unavailable, access names not resolved");
                (Arc::new(LatestUserState::new()), Some(err.kind()))
            }
            Err(other) => return Err(other),
        };

        Ok(RecentAccessRows {
            rows: reducer::join_accesses(&accesses, &users),
            users_unavailable,
        })
    }

    /// Latest state of a single user.
    pub async fn get_user(&self, user_id: &str) -> DomainResult<Option<UserState>> {
        let users = self.try_latest_user_state().await?;
        Ok(users.get(user_id.trim()).cloned())
    }

    /// Append a user event and invalidate every cached view.
    ///
    /// Creating and editing are the same operation: the new event simply
    /// becomes the latest one for its id.
    #[instrument(skip(self, draft), fields(user_id = %draft.user_id))]
    pub async fn create_or_update_user(&self, draft: &UserDraft) -> DomainResult<UserDraft> {
        let draft = draft.normalized().map_err(DomainError::ValidationFailed)?;

        if let Err(err) = self
            .client
            .submit_user_event(&self.settings.users_channel, &draft)
            .await
        {
            warn!(error = %err, "user event was not written");
            return Err(err.into());
        }

        info!(
            user_id = %draft.user_id,
            available = draft.available.as_flag(),
            "user event written"
        );
        self.invalidate_cache();
        Ok(draft)
    }

    /// Change a user's availability, keeping the other attributes.
    pub async fn set_availability(
        &self,
        user_id: &str,
        available: Availability,
    ) -> DomainResult<UserDraft> {
        let current = self
            .get_user(user_id)
            .await?
            .ok_or_else(|| DomainError::UserNotFound(user_id.trim().to_string()))?;

        let draft = UserDraft::new(current.user_id, current.name, current.lastname, available);
        self.create_or_update_user(&draft).await
    }

    /// Forget the cached user directory only.
    ///
    /// Reads already in flight are not fenced; writes use
    /// [`invalidate_cache`](Self::invalidate_cache) instead.
    pub async fn invalidate_users(&self) {
        self.users.invalidate(&()).await;
    }

    /// Forget every cached view so the next read goes upstream.
    pub fn invalidate_cache(&self) {
        self.users.invalidate_all();
        self.accesses.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use crate::domain::models::FeedRecord;

    struct StaticFeed {
        fetches: AtomicUsize,
    }

    #[async_trait]
    impl FeedClient for StaticFeed {
        async fn fetch_feed(
            &self,
            _channel: &ChannelConfig,
            _limit: usize,
        ) -> Result<Vec<FeedRecord>, FeedError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(vec![FeedRecord {
                created_at: "2025-06-01T10:00:00Z".into(),
                field1: Some("A".into()),
                field2: Some("Ana".into()),
                field3: Some("Lopez".into()),
                field4: Some("1".into()),
                ..Default::default()
            }])
        }

        async fn submit_user_event(
            &self,
            _channel: &ChannelConfig,
            _draft: &UserDraft,
        ) -> Result<(), FeedError> {
            Ok(())
        }
    }

    fn service() -> DirectoryService<StaticFeed> {
        let settings = DirectorySettings::from_config(&FeedConfig::default(), &CacheConfig::default());
        DirectoryService::new(
            Arc::new(StaticFeed {
                fetches: AtomicUsize::new(0),
            }),
            settings,
        )
    }

    #[tokio::test]
    async fn test_zero_accesses_is_rejected() {
        let service = service();
        let err = service.try_recent_accesses(0).await.unwrap_err();
        assert!(matches!(err, DomainError::ValidationFailed(_)));
        assert!(service.recent_accesses(0).await.is_empty());
        assert_eq!(service.client.fetches.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_blank_fields_are_rejected_before_writing() {
        let service = service();
        let draft = UserDraft::new("A", "", "Lopez", Availability::Enabled);
        let err = service.create_or_update_user(&draft).await.unwrap_err();
        assert!(matches!(err, DomainError::ValidationFailed(_)));
    }

    #[tokio::test]
    async fn test_invalidate_users_refetches_directory() {
        let service = service();
        service.latest_user_state().await;
        service.latest_user_state().await;
        assert_eq!(service.client.fetches.load(Ordering::SeqCst), 1);

        service.invalidate_users().await;
        service.latest_user_state().await;
        assert_eq!(service.client.fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_get_user_trims_id() {
        let service = service();
        let user = service.get_user(" A ").await.unwrap().unwrap();
        assert_eq!(user.name, "Ana");
    }
}
