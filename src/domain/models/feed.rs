//! Raw feed records as exposed by the data-logging service.
//!
//! Both channels share one wire shape: a timestamp plus up to four
//! untyped string fields. Interpretation of the fields is channel specific
//! and happens when a record is converted into a user or access event.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of a channel feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedRecord {
    /// Server-assigned creation timestamp (ISO-8601).
    pub created_at: String,
    /// Monotonic entry number within the channel, when present.
    #[serde(default)]
    pub entry_id: Option<u64>,
    #[serde(default)]
    pub field1: Option<String>,
    #[serde(default)]
    pub field2: Option<String>,
    #[serde(default)]
    pub field3: Option<String>,
    #[serde(default)]
    pub field4: Option<String>,
}

impl FeedRecord {
    /// Parse `created_at` into a UTC timestamp.
    pub fn timestamp(&self) -> Result<DateTime<Utc>, String> {
        DateTime::parse_from_rfc3339(self.created_at.trim())
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(|e| format!("invalid created_at '{}': {e}", self.created_at))
    }

    /// The user id carried in `field1`, if present and non-blank.
    pub fn user_id(&self) -> Option<&str> {
        self.field1
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

/// Response body of the feed read endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedResponse {
    #[serde(default)]
    pub feeds: Vec<FeedRecord>,
}
