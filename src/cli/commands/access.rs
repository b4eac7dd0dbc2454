//! Access CLI commands.

use anyhow::Result;
use clap::{Args, Subcommand};
use std::time::Duration;

use crate::cli::display::{
    colorize_attribute, list_table, output, render_list, truncate, warning, CommandOutput,
};
use crate::domain::errors::{DomainError, FeedErrorKind};
use crate::domain::models::AccessRow;
use crate::domain::ports::FeedClient;
use crate::services::DirectoryService;

#[derive(Args, Debug)]
pub struct AccessArgs {
    #[command(subcommand)]
    pub command: AccessCommands,
}

#[derive(Subcommand, Debug)]
pub enum AccessCommands {
    /// Show the most recent accesses with the user they belong to
    Recent {
        /// Number of accesses to show (defaults to feed.access_default_count)
        #[arg(short = 'n', long)]
        count: Option<usize>,
        /// Drop cached data before reading
        #[arg(short, long)]
        refresh: bool,
    },
    /// Re-render the recent accesses periodically until interrupted
    Watch {
        /// Number of accesses to show (defaults to feed.access_default_count)
        #[arg(short = 'n', long)]
        count: Option<usize>,
        /// Seconds between renders
        #[arg(short, long, default_value = "10")]
        interval: u64,
        /// Stop after this many renders
        #[arg(long)]
        iterations: Option<u32>,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct AccessRowOutput {
    pub date: String,
    pub id: String,
    pub name: String,
    pub lastname: String,
}

impl From<&AccessRow> for AccessRowOutput {
    fn from(row: &AccessRow) -> Self {
        Self {
            date: row.timestamp(),
            id: row.user_id.clone(),
            name: row.name.clone(),
            lastname: row.lastname.clone(),
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct AccessListOutput {
    pub accesses: Vec<AccessRowOutput>,
    pub total: usize,
    /// Set when the accesses feed could not be read.
    pub accesses_unavailable: Option<FeedErrorKind>,
    /// Set when the users feed could not be read; names show as `-`.
    pub users_unavailable: Option<FeedErrorKind>,
}

impl CommandOutput for AccessListOutput {
    fn to_human(&self) -> String {
        if let Some(kind) = self.accesses_unavailable {
            return warning(&format!(
                "Accesses feed is {}; no accesses can be shown.",
                kind.as_str()
            ));
        }

        let mut table = list_table(&["date", "id", "name", "lastname"]);
        for row in &self.accesses {
            table.add_row(vec![
                row.date.clone(),
                row.id.clone(),
                colorize_attribute(&truncate(&row.name, 24)).to_string(),
                colorize_attribute(&truncate(&row.lastname, 24)).to_string(),
            ]);
        }
        let list = render_list("access", "accesses", &table, self.total);

        match self.users_unavailable {
            Some(kind) => format!(
                "{}\n{list}",
                warning(&format!(
                    "Users feed is {}; names cannot be resolved.",
                    kind.as_str()
                ))
            ),
            None => list,
        }
    }
}

pub async fn recent_accesses<C: FeedClient>(
    service: &DirectoryService<C>,
    count: usize,
    refresh: bool,
) -> Result<AccessListOutput> {
    if refresh {
        service.invalidate_cache();
    }

    match service.recent_access_rows(count).await {
        Ok(view) => Ok(AccessListOutput {
            total: view.rows.len(),
            accesses: view.rows.iter().map(AccessRowOutput::from).collect(),
            accesses_unavailable: None,
            users_unavailable: view.users_unavailable,
        }),
        Err(DomainError::Feed(err)) => Ok(AccessListOutput {
            accesses: Vec::new(),
            total: 0,
            accesses_unavailable: Some(err.kind()),
            users_unavailable: None,
        }),
        Err(other) => Err(other.into()),
    }
}

async fn watch<C: FeedClient>(
    service: &DirectoryService<C>,
    count: usize,
    interval: Duration,
    iterations: Option<u32>,
    json_mode: bool,
) -> Result<()> {
    let mut rendered = 0u32;
    loop {
        let out = recent_accesses(service, count, false).await?;
        if !json_mode {
            println!(
                "\n-- {} --",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
            );
        }
        output(&out, json_mode);

        rendered += 1;
        if iterations.is_some_and(|max| rendered >= max) {
            return Ok(());
        }

        tokio::select! {
            () = tokio::time::sleep(interval) => {}
            _ = tokio::signal::ctrl_c() => return Ok(()),
        }
    }
}

pub async fn execute<C: FeedClient>(
    args: AccessArgs,
    service: &DirectoryService<C>,
    default_count: usize,
    json_mode: bool,
) -> Result<()> {
    match args.command {
        AccessCommands::Recent { count, refresh } => {
            let out = recent_accesses(service, count.unwrap_or(default_count), refresh).await?;
            output(&out, json_mode);
        }

        AccessCommands::Watch {
            count,
            interval,
            iterations,
        } => {
            let interval = Duration::from_secs(interval.max(1));
            watch(
                service,
                count.unwrap_or(default_count),
                interval,
                iterations,
                json_mode,
            )
            .await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, name: &str) -> AccessRowOutput {
        AccessRowOutput {
            date: "2025-03-05 09:00:00".to_string(),
            id: id.to_string(),
            name: name.to_string(),
            lastname: name.to_string(),
        }
    }

    #[test]
    fn test_unavailable_accesses_feed_renders_warning() {
        colored::control::set_override(false);
        let out = AccessListOutput {
            accesses: Vec::new(),
            total: 0,
            accesses_unavailable: Some(FeedErrorKind::Unreachable),
            users_unavailable: None,
        };
        assert_eq!(
            out.to_human(),
            "! Accesses feed is unreachable; no accesses can be shown."
        );
        assert_eq!(out.to_json()["accesses_unavailable"], "unreachable");
    }

    #[test]
    fn test_unavailable_users_feed_keeps_rows() {
        colored::control::set_override(false);
        let out = AccessListOutput {
            accesses: vec![row("A1", "-")],
            total: 1,
            accesses_unavailable: None,
            users_unavailable: Some(FeedErrorKind::Malformed),
        };
        let rendered = out.to_human();
        assert!(rendered.starts_with("! Users feed is malformed; names cannot be resolved."));
        assert!(rendered.contains("1 access:"));
        assert!(rendered.contains("A1"));
        assert!(out.to_json()["accesses_unavailable"].is_null());
    }

    #[test]
    fn test_rows_render_with_placeholder() {
        colored::control::set_override(false);
        let out = AccessListOutput {
            accesses: vec![row("X9", "-")],
            total: 1,
            accesses_unavailable: None,
            users_unavailable: None,
        };
        let rendered = out.to_human();
        assert!(rendered.starts_with("1 access:"));
        assert!(rendered.contains("LASTNAME"));
        assert!(rendered.contains("X9"));
    }
}
