//! ThingSpeak HTTP client.
//!
//! Wraps the channel feed read endpoint and the update endpoint. Every
//! request carries the configured timeout and is sent exactly once; errors
//! are returned as typed [`FeedError`]s and never retried here.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::domain::errors::FeedError;
use crate::domain::models::{ChannelConfig, FeedConfig, FeedRecord, FeedResponse, UserDraft};
use crate::domain::ports::FeedClient;
use crate::infrastructure::logging::SecretScrubber;

use super::models::{is_accepted_body, UpdateRequest};

/// Configuration for the ThingSpeak HTTP client
#[derive(Debug, Clone)]
pub struct ThingSpeakClientConfig {
    /// Base URL of the API, without trailing slash
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ThingSpeakClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.thingspeak.com".to_string(),
            timeout_secs: 8,
        }
    }
}

impl From<&FeedConfig> for ThingSpeakClientConfig {
    fn from(config: &FeedConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            timeout_secs: config.timeout_secs,
        }
    }
}

/// HTTP client for the ThingSpeak channel API.
#[derive(Debug, Clone)]
pub struct ThingSpeakClient {
    http: Client,
    base_url: String,
    scrubber: SecretScrubber,
}

impl ThingSpeakClient {
    /// Create a client with the default base URL and timeout.
    pub fn new() -> Result<Self> {
        Self::with_config(ThingSpeakClientConfig::default())
    }

    /// Create a client with custom configuration.
    pub fn with_config(config: ThingSpeakClientConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            scrubber: SecretScrubber::new(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn feeds_url(&self, channel_id: &str) -> String {
        format!("{}/channels/{}/feeds.json", self.base_url, channel_id)
    }

    fn update_url(&self) -> String {
        format!("{}/update.json", self.base_url)
    }

    /// Turn a non-success response into a [`FeedError::Status`].
    async fn status_error(&self, resp: reqwest::Response) -> FeedError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let body = self.scrubber.scrub_message(&body);
        warn!(status, body = %body, "feed service returned an error status");
        FeedError::Status { status, body }
    }
}

#[async_trait]
impl FeedClient for ThingSpeakClient {
    #[instrument(skip(self, channel), fields(channel_id = %channel.channel_id))]
    async fn fetch_feed(
        &self,
        channel: &ChannelConfig,
        limit: usize,
    ) -> Result<Vec<FeedRecord>, FeedError> {
        let url = self.feeds_url(&channel.channel_id);
        let results = limit.to_string();
        debug!(url = %url, limit, "fetching channel feed");

        let resp = self
            .http
            .get(&url)
            .query(&[
                ("api_key", channel.read_key.as_str()),
                ("results", results.as_str()),
            ])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(self.status_error(resp).await);
        }

        let body: FeedResponse = resp.json().await?;
        debug!(records = body.feeds.len(), "channel feed fetched");
        Ok(body.feeds)
    }

    #[instrument(skip(self, channel, draft), fields(channel_id = %channel.channel_id, user_id = %draft.user_id))]
    async fn submit_user_event(
        &self,
        channel: &ChannelConfig,
        draft: &UserDraft,
    ) -> Result<(), FeedError> {
        let api_key = channel
            .write_key
            .as_deref()
            .ok_or_else(|| FeedError::MissingWriteKey(channel.channel_id.clone()))?;

        let resp = self
            .http
            .post(self.update_url())
            .form(&UpdateRequest::for_user(api_key, draft))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(self.status_error(resp).await);
        }

        let body = resp.text().await?;
        if !is_accepted_body(&body) {
            warn!("feed service rejected the update");
            return Err(FeedError::Rejected);
        }

        debug!("user event appended");
        Ok(())
    }
}
