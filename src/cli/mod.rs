//! Command-line presentation surface.

pub mod commands;
pub mod display;
pub mod types;

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

use crate::adapters::thingspeak::{ThingSpeakClient, ThingSpeakClientConfig};
use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;
use crate::services::{DirectoryService, DirectorySettings};

pub use types::{Cli, Commands};

/// Load configuration from an explicit file or the project hierarchy.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load()
            .context("Failed to load configuration. Configure channels in .clave/config.yaml"),
    }
}

/// Build the directory service backed by the HTTP feed client.
pub fn build_directory(config: &Config) -> Result<DirectoryService<ThingSpeakClient>> {
    let client = ThingSpeakClient::with_config(ThingSpeakClientConfig::from(&config.feed))?;
    Ok(DirectoryService::new(
        Arc::new(client),
        DirectorySettings::from_config(&config.feed, &config.cache),
    ))
}

/// Run a parsed command against the configured directory.
pub async fn run(command: Commands, config: &Config, json_mode: bool) -> Result<()> {
    let service = build_directory(config)?;

    match command {
        Commands::User(args) => commands::user::execute(args, &service, json_mode).await,
        Commands::Access(args) => {
            commands::access::execute(
                args,
                &service,
                config.feed.access_default_count,
                json_mode,
            )
            .await
        }
    }
}

/// Print an error the way the output mode expects and exit with status 1.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let body = serde_json::json!({
            "success": false,
            "error": format!("{err:#}"),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&body).unwrap_or_default()
        );
    } else {
        eprintln!("{}", display::action_failure(&format!("{err:#}")));
    }
    std::process::exit(1);
}
