//! Clave CLI entry point.

use clap::Parser;

use clave::cli::{handle_error, load_config, run, Cli};
use clave::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => handle_error(err, cli.json),
    };

    // Held for the whole run so buffered file logs are flushed on exit.
    let _logger = match LogConfig::try_from(&config.logging).and_then(|c| LoggerImpl::init(&c)) {
        Ok(logger) => logger,
        Err(err) => handle_error(err, cli.json),
    };

    if let Err(err) = run(cli.command, &config, cli.json).await {
        handle_error(err, cli.json);
    }
}
