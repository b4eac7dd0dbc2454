//! User CLI commands.

use anyhow::{anyhow, Result};
use clap::{Args, Subcommand};

use crate::cli::display::{
    action_success, colorize_access, list_table, output, render_list, truncate, warning,
    CommandOutput,
};
use crate::domain::errors::{DomainError, FeedErrorKind};
use crate::domain::models::{Availability, UserDraft, UserState};
use crate::domain::ports::FeedClient;
use crate::services::DirectoryService;

#[derive(Args, Debug)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommands,
}

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Register a new user
    Create {
        /// Badge / user identifier
        id: String,
        /// First name
        name: String,
        /// Last name
        lastname: String,
        /// Whether the user may pass (yes, no)
        #[arg(short, long, default_value = "yes", value_parser = parse_availability)]
        access: Availability,
    },
    /// Grant or revoke a user's access, keeping name and lastname
    SetAccess {
        /// User identifier
        id: String,
        /// New access flag (yes, no)
        #[arg(value_parser = parse_availability)]
        access: Availability,
    },
    /// List every user with its current access flag
    List {
        /// Drop cached data before reading
        #[arg(short, long)]
        refresh: bool,
    },
    /// Show the current state of one user
    Show {
        /// User identifier
        id: String,
    },
}

fn parse_availability(s: &str) -> Result<Availability, String> {
    Availability::from_str(s).ok_or_else(|| format!("invalid access '{s}' (expected yes or no)"))
}

#[derive(Debug, serde::Serialize)]
pub struct UserOutput {
    pub id: String,
    pub name: String,
    pub lastname: String,
    pub access: String,
    pub updated_at: Option<String>,
}

impl From<&UserState> for UserOutput {
    fn from(user: &UserState) -> Self {
        Self {
            id: user.user_id.clone(),
            name: user.name.clone(),
            lastname: user.lastname.clone(),
            access: user.available.as_str().to_string(),
            updated_at: Some(user.updated_at.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }
}

impl From<&UserDraft> for UserOutput {
    fn from(draft: &UserDraft) -> Self {
        Self {
            id: draft.user_id.clone(),
            name: draft.name.clone(),
            lastname: draft.lastname.clone(),
            access: draft.available.as_str().to_string(),
            updated_at: None,
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct UserListOutput {
    pub users: Vec<UserOutput>,
    pub total: usize,
    /// Set when the users feed could not be read.
    pub unavailable: Option<FeedErrorKind>,
}

impl CommandOutput for UserListOutput {
    fn to_human(&self) -> String {
        if let Some(kind) = self.unavailable {
            return warning(&format!(
                "Users feed is {}; no users can be shown.",
                kind.as_str()
            ));
        }

        let mut table = list_table(&["id", "name", "lastname", "access"]);
        for user in &self.users {
            table.add_row(vec![
                user.id.clone(),
                truncate(&user.name, 24),
                truncate(&user.lastname, 24),
                colorize_access(&user.access).to_string(),
            ]);
        }
        render_list("user", "users", &table, self.total)
    }
}

#[derive(Debug, serde::Serialize)]
pub struct UserDetailOutput {
    pub user: UserOutput,
}

impl CommandOutput for UserDetailOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![
            format!("User: {} {}", self.user.name, self.user.lastname),
            format!("ID: {}", self.user.id),
            format!("Access: {}", colorize_access(&self.user.access)),
        ];
        if let Some(updated_at) = &self.user.updated_at {
            lines.push(format!("Updated: {updated_at} UTC"));
        }
        lines.join("\n")
    }
}

#[derive(Debug, serde::Serialize)]
pub struct UserActionOutput {
    pub success: bool,
    pub message: String,
    pub user: Option<UserOutput>,
}

impl CommandOutput for UserActionOutput {
    fn to_human(&self) -> String {
        action_success(&self.message)
    }
}

/// Map a write failure to the message shown to the operator.
///
/// Feed failures get a generic message; the cause has already been logged.
fn write_failure(err: DomainError, action: &str) -> anyhow::Error {
    match err {
        DomainError::Feed(_) => anyhow!("Could not {action} the user. Try again."),
        other => anyhow!(other),
    }
}

pub async fn create_user<C: FeedClient>(
    service: &DirectoryService<C>,
    draft: UserDraft,
) -> Result<UserActionOutput> {
    let written = service
        .create_or_update_user(&draft)
        .await
        .map_err(|err| write_failure(err, "create"))?;

    Ok(UserActionOutput {
        success: true,
        message: format!("User {} created.", written.user_id),
        user: Some(UserOutput::from(&written)),
    })
}

pub async fn set_access<C: FeedClient>(
    service: &DirectoryService<C>,
    id: &str,
    access: Availability,
) -> Result<UserActionOutput> {
    let written = service
        .set_availability(id, access)
        .await
        .map_err(|err| write_failure(err, "update"))?;

    Ok(UserActionOutput {
        success: true,
        message: format!(
            "Access for {} set to {}.",
            written.user_id,
            written.available.as_str()
        ),
        user: Some(UserOutput::from(&written)),
    })
}

pub async fn list_users<C: FeedClient>(
    service: &DirectoryService<C>,
    refresh: bool,
) -> Result<UserListOutput> {
    if refresh {
        service.invalidate_users().await;
    }

    match service.try_latest_user_state().await {
        Ok(users) => Ok(UserListOutput {
            total: users.len(),
            users: users.iter().map(UserOutput::from).collect(),
            unavailable: None,
        }),
        Err(DomainError::Feed(err)) => Ok(UserListOutput {
            users: Vec::new(),
            total: 0,
            unavailable: Some(err.kind()),
        }),
        Err(other) => Err(other.into()),
    }
}

pub async fn show_user<C: FeedClient>(
    service: &DirectoryService<C>,
    id: &str,
) -> Result<UserDetailOutput> {
    let user = service
        .get_user(id)
        .await?
        .ok_or_else(|| DomainError::UserNotFound(id.trim().to_string()))?;

    Ok(UserDetailOutput {
        user: UserOutput::from(&user),
    })
}

pub async fn execute<C: FeedClient>(
    args: UserArgs,
    service: &DirectoryService<C>,
    json_mode: bool,
) -> Result<()> {
    match args.command {
        UserCommands::Create {
            id,
            name,
            lastname,
            access,
        } => {
            let out = create_user(service, UserDraft::new(id, name, lastname, access)).await?;
            output(&out, json_mode);
        }

        UserCommands::SetAccess { id, access } => {
            let out = set_access(service, &id, access).await?;
            output(&out, json_mode);
        }

        UserCommands::List { refresh } => {
            let out = list_users(service, refresh).await?;
            output(&out, json_mode);
        }

        UserCommands::Show { id } => {
            let out = show_user(service, &id).await?;
            output(&out, json_mode);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_availability() {
        assert_eq!(parse_availability("no"), Ok(Availability::Disabled));
        assert!(parse_availability("later").is_err());
    }

    #[test]
    fn test_feed_write_failure_is_generic() {
        let err = write_failure(
            DomainError::Feed(crate::domain::errors::FeedError::Rejected),
            "create",
        );
        assert_eq!(err.to_string(), "Could not create the user. Try again.");

        let err = write_failure(DomainError::UserNotFound("Z9".to_string()), "update");
        assert!(err.to_string().contains("Z9"));
    }

    #[test]
    fn test_draft_output_has_no_timestamp() {
        let draft = UserDraft::new("A1", "Ana", "Lopez", Availability::Enabled);
        let out = UserOutput::from(&draft);
        assert_eq!(out.access, "yes");
        assert!(out.updated_at.is_none());
    }
}
