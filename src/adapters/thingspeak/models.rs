//! Request models for the channel write endpoint.
//!
//! Read responses deserialize straight into the domain
//! [`FeedResponse`](crate::domain::models::FeedResponse).

use serde::Serialize;

use crate::domain::models::UserDraft;

/// Form body of `POST /update.json`.
///
/// Field order on the users channel: id, name, lastname, availability flag.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateRequest<'a> {
    pub api_key: &'a str,
    pub field1: &'a str,
    pub field2: &'a str,
    pub field3: &'a str,
    pub field4: u8,
}

impl<'a> UpdateRequest<'a> {
    pub fn for_user(api_key: &'a str, draft: &'a UserDraft) -> Self {
        Self {
            api_key,
            field1: &draft.user_id,
            field2: &draft.name,
            field3: &draft.lastname,
            field4: draft.available.as_flag(),
        }
    }
}

/// Literal body the write endpoint answers with when it drops an update.
pub const REJECTED_SENTINEL: &str = "0";

/// Whether a 2xx write response body actually reports success.
pub fn is_accepted_body(body: &str) -> bool {
    let body = body.trim();
    !body.is_empty() && body != REJECTED_SENTINEL
}
