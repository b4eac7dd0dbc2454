use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::{ChannelConfig, Config};

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Feed base_url cannot be empty")]
    EmptyBaseUrl,

    #[error("Invalid timeout_secs: {0}. Must be at least 1")]
    InvalidTimeout(u64),

    #[error("Invalid user_fetch_limit: {0}. Must be at least 1")]
    InvalidUserFetchLimit(usize),

    #[error("Invalid access_default_count: {0}. Must be at least 1")]
    InvalidAccessCount(usize),

    #[error("Channel '{0}' is missing its channel_id")]
    MissingChannelId(&'static str),

    #[error("Channel '{0}' is missing its read_key")]
    MissingReadKey(&'static str),

    #[error("Invalid cache ttl_secs: {0}. Must be at least 1")]
    InvalidTtl(u64),

    #[error("Invalid cache max_capacity: {0}. Must be at least 1")]
    InvalidCacheCapacity(u64),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidLogRotation(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .clave/config.yaml (project config)
    /// 3. .clave/local.yaml (local overrides, typically holding the API keys)
    /// 4. Environment variables (CLAVE_* prefix, `__` for nesting)
    pub fn load() -> Result<Config> {
        let config: Config = Self::figment()
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honouring env overrides
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed("CLAVE_").split("__"))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    fn figment() -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".clave/config.yaml"))
            .merge(Yaml::file(".clave/local.yaml"))
            .merge(Env::prefixed("CLAVE_").split("__"))
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let feed = &config.feed;

        if feed.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }

        if feed.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(feed.timeout_secs));
        }

        if feed.user_fetch_limit == 0 {
            return Err(ConfigError::InvalidUserFetchLimit(feed.user_fetch_limit));
        }

        if feed.access_default_count == 0 {
            return Err(ConfigError::InvalidAccessCount(feed.access_default_count));
        }

        Self::validate_channel("users", &feed.users)?;
        Self::validate_channel("accesses", &feed.accesses)?;

        if config.cache.ttl_secs == 0 {
            return Err(ConfigError::InvalidTtl(config.cache.ttl_secs));
        }

        if config.cache.max_capacity == 0 {
            return Err(ConfigError::InvalidCacheCapacity(config.cache.max_capacity));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidLogRotation(
                config.logging.rotation.clone(),
            ));
        }

        Ok(())
    }

    fn validate_channel(name: &'static str, channel: &ChannelConfig) -> Result<(), ConfigError> {
        if channel.channel_id.trim().is_empty() {
            return Err(ConfigError::MissingChannelId(name));
        }
        if channel.read_key.trim().is_empty() {
            return Err(ConfigError::MissingReadKey(name));
        }
        Ok(())
    }
}
