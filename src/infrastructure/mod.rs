//! Infrastructure layer module
//!
//! Configuration loading and logging setup. Feed and cache adapters that
//! satisfy the domain ports live under `adapters`.

pub mod config;
pub mod logging;
