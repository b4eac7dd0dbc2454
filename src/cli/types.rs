//! CLI type definitions
//!
//! This module contains the top-level clap structures. Each subcommand's
//! arguments live next to its implementation in [`crate::cli::commands`].

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::commands::access::AccessArgs;
use super::commands::user::UserArgs;

#[derive(Parser, Debug)]
#[command(name = "clave")]
#[command(about = "Clave - access-control kiosk administration console", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Load configuration from this YAML file instead of .clave/
    #[arg(short, long, global = true, env = "CLAVE_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create, edit and list kiosk users
    User(UserArgs),

    /// Inspect recent kiosk accesses
    Access(AccessArgs),
}
