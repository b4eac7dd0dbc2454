use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for Clave
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Upstream feed service configuration
    #[serde(default)]
    pub feed: FeedConfig,

    /// Recency cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Upstream data-logging service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FeedConfig {
    /// Base URL of the service API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timeout applied to every request, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Upper bound on user records fetched to rebuild the latest state
    #[serde(default = "default_user_fetch_limit")]
    pub user_fetch_limit: usize,

    /// Number of access records shown when no count is given
    #[serde(default = "default_access_default_count")]
    pub access_default_count: usize,

    /// Users channel
    #[serde(default)]
    pub users: ChannelConfig,

    /// Accesses channel
    #[serde(default)]
    pub accesses: ChannelConfig,
}

fn default_base_url() -> String {
    "https://api.thingspeak.com".to_string()
}

const fn default_timeout_secs() -> u64 {
    8
}

const fn default_user_fetch_limit() -> usize {
    8000
}

const fn default_access_default_count() -> usize {
    30
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_fetch_limit: default_user_fetch_limit(),
            access_default_count: default_access_default_count(),
            users: ChannelConfig::default(),
            accesses: ChannelConfig::default(),
        }
    }
}

/// One logical channel and its API keys
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ChannelConfig {
    /// Channel identifier
    #[serde(default, deserialize_with = "string_or_number")]
    pub channel_id: String,

    /// Read API key
    #[serde(default)]
    pub read_key: String,

    /// Write API key (only needed for channels this console writes to)
    #[serde(default)]
    pub write_key: Option<String>,
}

impl ChannelConfig {
    pub fn new(channel_id: impl Into<String>, read_key: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            read_key: read_key.into(),
            write_key: None,
        }
    }

    #[must_use]
    pub fn with_write_key(mut self, write_key: impl Into<String>) -> Self {
        self.write_key = Some(write_key.into());
        self
    }
}

/// Channel ids are numeric upstream, so YAML and env values often arrive as
/// integers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}

/// Recency cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CacheConfig {
    /// Validity window of a computed view, in seconds
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,

    /// Maximum number of cached views per pipeline
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
}

const fn default_ttl_secs() -> u64 {
    30
}

const fn default_max_capacity() -> u64 {
    64
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            max_capacity: default_max_capacity(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files; stderr only when unset
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Rotation of log files: daily, hourly or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}
