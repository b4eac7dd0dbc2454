//! User domain model.
//!
//! Users are never stored as rows. Every create or edit appends a
//! [`UserEvent`] to the users channel, and the current view of a user is the
//! most recent event carrying its id (see [`LatestUserState`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

use super::feed::FeedRecord;

/// Whether a user is allowed through the kiosk.
///
/// Stored upstream as the integer flag `1` / `0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    /// Access granted.
    #[default]
    Enabled,
    /// Access revoked.
    Disabled,
}

impl Availability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enabled => "yes",
            Self::Disabled => "no",
        }
    }

    /// Upstream flag value.
    pub fn as_flag(&self) -> u8 {
        match self {
            Self::Enabled => 1,
            Self::Disabled => 0,
        }
    }

    pub fn from_flag(flag: i64) -> Self {
        if flag == 0 {
            Self::Disabled
        } else {
            Self::Enabled
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "yes" | "y" | "si" | "sí" | "1" | "true" | "enabled" => Some(Self::Enabled),
            "no" | "n" | "0" | "false" | "disabled" => Some(Self::Disabled),
            _ => None,
        }
    }

    /// Parse the upstream `field4` value.
    ///
    /// Missing or blank means disabled. A value that is not an integer also
    /// reads as disabled, so a garbled newest event never falls back to an
    /// older grant.
    fn from_field(field: Option<&str>) -> Self {
        match field.map(str::trim) {
            None | Some("") => Self::Disabled,
            Some(raw) => raw.parse::<i64>().map_or_else(
                |_| {
                    warn!(flag = raw, "unparsable availability flag, treating as disabled");
                    Self::Disabled
                },
                Self::from_flag,
            ),
        }
    }
}

impl std::fmt::Display for Availability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable entry of the users channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserEvent {
    pub created_at: DateTime<Utc>,
    pub user_id: String,
    pub name: String,
    pub lastname: String,
    pub available: Availability,
}

impl UserEvent {
    pub fn new(
        created_at: DateTime<Utc>,
        user_id: impl Into<String>,
        name: impl Into<String>,
        lastname: impl Into<String>,
        available: Availability,
    ) -> Self {
        Self {
            created_at,
            user_id: user_id.into(),
            name: name.into(),
            lastname: lastname.into(),
            available,
        }
    }
}

impl TryFrom<&FeedRecord> for UserEvent {
    type Error = String;

    fn try_from(record: &FeedRecord) -> Result<Self, Self::Error> {
        let user_id = record.user_id().ok_or("missing user id")?;
        let created_at = record.timestamp()?;
        let available = Availability::from_field(record.field4.as_deref());

        Ok(Self {
            created_at,
            user_id: user_id.to_string(),
            name: record.field2.clone().unwrap_or_default(),
            lastname: record.field3.clone().unwrap_or_default(),
            available,
        })
    }
}

/// A user event that has not been written yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDraft {
    pub user_id: String,
    pub name: String,
    pub lastname: String,
    pub available: Availability,
}

impl UserDraft {
    pub fn new(
        user_id: impl Into<String>,
        name: impl Into<String>,
        lastname: impl Into<String>,
        available: Availability,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            lastname: lastname.into(),
            available,
        }
    }

    /// Trim every text field and require all of them to be present.
    pub fn normalized(&self) -> Result<Self, String> {
        let draft = Self {
            user_id: self.user_id.trim().to_string(),
            name: self.name.trim().to_string(),
            lastname: self.lastname.trim().to_string(),
            available: self.available,
        };

        let missing: Vec<&str> = [
            ("id", &draft.user_id),
            ("name", &draft.name),
            ("lastname", &draft.lastname),
        ]
        .iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| *field)
        .collect();

        if missing.is_empty() {
            Ok(draft)
        } else {
            Err(format!("missing required field(s): {}", missing.join(", ")))
        }
    }
}

/// The current attributes of one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserState {
    pub user_id: String,
    pub name: String,
    pub lastname: String,
    pub available: Availability,
    /// Timestamp of the event these attributes come from.
    pub updated_at: DateTime<Utc>,
}

impl From<&UserEvent> for UserState {
    fn from(event: &UserEvent) -> Self {
        Self {
            user_id: event.user_id.clone(),
            name: event.name.clone(),
            lastname: event.lastname.clone(),
            available: event.available,
            updated_at: event.created_at,
        }
    }
}

/// Ordered mapping from user id to that user's latest attributes.
///
/// Iteration order is most-recently-updated user first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LatestUserState {
    entries: Vec<UserState>,
    index: HashMap<String, usize>,
}

impl LatestUserState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a user unless its id is already present.
    ///
    /// Returns `false` when the id was already recorded.
    pub fn insert_if_absent(&mut self, state: UserState) -> bool {
        if self.index.contains_key(&state.user_id) {
            return false;
        }
        self.index.insert(state.user_id.clone(), self.entries.len());
        self.entries.push(state);
        true
    }

    pub fn get(&self, user_id: &str) -> Option<&UserState> {
        self.index.get(user_id).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.index.contains_key(user_id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, UserState> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_slice(&self) -> &[UserState] {
        &self.entries
    }
}

impl<'a> IntoIterator for &'a LatestUserState {
    type Item = &'a UserState;
    type IntoIter = std::slice::Iter<'a, UserState>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for LatestUserState {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}
