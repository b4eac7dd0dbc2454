//! Domain errors for the Clave console.

use thiserror::Error;

/// Coarse classification of a feed failure, for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedErrorKind {
    /// The service could not be reached or answered with a non-success status.
    Unreachable,
    /// The service answered but the payload could not be understood.
    Malformed,
    /// The write endpoint refused the update.
    Rejected,
}

impl FeedErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unreachable => "unreachable",
            Self::Malformed => "malformed",
            Self::Rejected => "rejected",
        }
    }
}

/// Errors raised at the feed client boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FeedError {
    #[error("Feed request failed: {0}")]
    Transport(String),

    #[error("Feed request timed out")]
    Timeout,

    #[error("Feed service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed feed response: {0}")]
    Malformed(String),

    #[error("Feed service rejected the update")]
    Rejected,

    #[error("Channel {0} has no write key configured")]
    MissingWriteKey(String),
}

impl FeedError {
    /// Collapse the error into the kind an operator-facing view cares about.
    pub fn kind(&self) -> FeedErrorKind {
        match self {
            Self::Transport(_) | Self::Timeout | Self::Status { .. } => FeedErrorKind::Unreachable,
            Self::Malformed(_) => FeedErrorKind::Malformed,
            Self::Rejected | Self::MissingWriteKey(_) => FeedErrorKind::Rejected,
        }
    }
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Malformed(err.to_string())
        } else {
            // reqwest embeds the full URL (and therefore the api key) in its message
            Self::Transport(err.without_url().to_string())
        }
    }
}

/// Domain-level errors that can occur in the Clave console.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}

impl DomainError {
    /// The feed failure kind, if this error came from the feed client.
    pub fn feed_kind(&self) -> Option<FeedErrorKind> {
        match self {
            Self::Feed(err) => Some(err.kind()),
            _ => None,
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
