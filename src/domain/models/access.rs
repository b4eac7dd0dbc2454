//! Access domain model.
//!
//! The kiosk appends one entry to the accesses channel each time a badge is
//! presented. Only the timestamp and the user id are meaningful here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::feed::FeedRecord;
use crate::domain::errors::FeedErrorKind;

/// Placeholder shown for attributes of a user id with no known user.
pub const UNKNOWN_ATTRIBUTE: &str = "-";

/// An immutable entry of the accesses channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessEvent {
    pub created_at: DateTime<Utc>,
    pub user_id: String,
}

impl AccessEvent {
    pub fn new(created_at: DateTime<Utc>, user_id: impl Into<String>) -> Self {
        Self {
            created_at,
            user_id: user_id.into(),
        }
    }
}

impl TryFrom<&FeedRecord> for AccessEvent {
    type Error = String;

    fn try_from(record: &FeedRecord) -> Result<Self, Self::Error> {
        let user_id = record.user_id().ok_or("missing user id")?;
        Ok(Self {
            created_at: record.timestamp()?,
            user_id: user_id.to_string(),
        })
    }
}

/// One row of the recent-accesses view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRow {
    pub created_at: DateTime<Utc>,
    pub user_id: String,
    pub name: String,
    pub lastname: String,
}

impl AccessRow {
    /// `YYYY-MM-DD HH:MM:SS` rendering of the access time.
    pub fn timestamp(&self) -> String {
        self.created_at.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    /// Whether the access belongs to a user id absent from the users channel.
    pub fn is_unknown_user(&self) -> bool {
        self.name == UNKNOWN_ATTRIBUTE && self.lastname == UNKNOWN_ATTRIBUTE
    }
}

/// The recent-accesses view together with the state of the users lookup.
///
/// `users_unavailable` is set when the users feed could not be read; the rows
/// are then joined against no users and every name shows
/// [`UNKNOWN_ATTRIBUTE`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentAccessRows {
    pub rows: Vec<AccessRow>,
    pub users_unavailable: Option<FeedErrorKind>,
}
