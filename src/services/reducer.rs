//! Folding of append-only feeds into current-state views.
//!
//! The users channel holds every version of every user. The latest state of
//! a user is the event with the greatest `created_at` for its id; events are
//! visited newest first and the first occurrence of each id wins.
//!
//! Events sharing a `created_at` for the same id keep their relative feed
//! order (the sort is stable). Upstream does not document that order, so no
//! further tie-break is applied.

use tracing::warn;

use crate::domain::models::{
    AccessEvent, AccessRow, FeedRecord, LatestUserState, UserEvent, UserState,
    UNKNOWN_ATTRIBUTE,
};

/// Convert raw users-channel records, skipping the ones that do not describe
/// a user event.
pub fn user_events_from_records(records: &[FeedRecord]) -> Vec<UserEvent> {
    records
        .iter()
        .filter_map(|record| match UserEvent::try_from(record) {
            Ok(event) => Some(event),
            Err(reason) => {
                warn!(entry_id = ?record.entry_id, %reason, "skipping user record");
                None
            }
        })
        .collect()
}

/// Convert raw accesses-channel records, skipping unusable ones.
pub fn access_events_from_records(records: &[FeedRecord]) -> Vec<AccessEvent> {
    records
        .iter()
        .filter_map(|record| match AccessEvent::try_from(record) {
            Ok(event) => Some(event),
            Err(reason) => {
                warn!(entry_id = ?record.entry_id, %reason, "skipping access record");
                None
            }
        })
        .collect()
}

/// Reduce a user event history to the latest state per user id.
pub fn latest_user_state(mut events: Vec<UserEvent>) -> LatestUserState {
    events.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let mut latest = LatestUserState::new();
    for event in &events {
        latest.insert_if_absent(UserState::from(event));
    }
    latest
}

/// Order access events newest first.
pub fn sort_recent(mut accesses: Vec<AccessEvent>) -> Vec<AccessEvent> {
    accesses.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    accesses
}

/// Attach user names to access events, newest first.
///
/// Accesses by ids missing from `users` keep the id and show
/// [`UNKNOWN_ATTRIBUTE`] for name and lastname.
pub fn join_accesses(accesses: &[AccessEvent], users: &LatestUserState) -> Vec<AccessRow> {
    let mut rows: Vec<AccessRow> = accesses
        .iter()
        .map(|access| {
            let (name, lastname) = users.get(&access.user_id).map_or_else(
                || (UNKNOWN_ATTRIBUTE.to_string(), UNKNOWN_ATTRIBUTE.to_string()),
                |user| (user.name.clone(), user.lastname.clone()),
            );
            AccessRow {
                created_at: access.created_at,
                user_id: access.user_id.clone(),
                name,
                lastname,
            }
        })
        .collect();
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Availability;
    use chrono::{DateTime, TimeZone, Utc};

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_750_000_000 + secs, 0).unwrap()
    }

    fn event(secs: i64, id: &str, name: &str, available: Availability) -> UserEvent {
        UserEvent::new(t(secs), id, name, "Lopez", available)
    }

    #[test]
    fn test_most_recent_event_wins() {
        let events = vec![
            event(1, "A", "Ana", Availability::Disabled),
            event(2, "A", "Ana", Availability::Enabled),
        ];

        let latest = latest_user_state(events);

        assert_eq!(latest.len(), 1);
        let ana = latest.get("A").unwrap();
        assert_eq!(ana.name, "Ana");
        assert_eq!(ana.available, Availability::Enabled);
        assert_eq!(ana.updated_at, t(2));
    }

    #[test]
    fn test_garbled_newest_flag_still_wins() {
        let record = |ts: &str, flag: &str| FeedRecord {
            created_at: ts.to_string(),
            field1: Some("A".to_string()),
            field2: Some("Ana".to_string()),
            field3: Some("Lopez".to_string()),
            field4: Some(flag.to_string()),
            ..Default::default()
        };
        let records = vec![
            record("2025-06-01T00:00:01Z", "1"),
            record("2025-06-01T00:00:02Z", "0.0"),
        ];

        let events = user_events_from_records(&records);
        assert_eq!(events.len(), 2);

        let latest = latest_user_state(events);
        let ana = latest.get("A").unwrap();
        assert_eq!(ana.available, Availability::Disabled);
        assert_eq!(ana.updated_at.format("%S").to_string(), "02");
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let events = vec![
            event(5, "A", "Ana v3", Availability::Enabled),
            event(1, "A", "Ana v1", Availability::Disabled),
            event(3, "A", "Ana v2", Availability::Disabled),
        ];

        let latest = latest_user_state(events);
        assert_eq!(latest.get("A").unwrap().name, "Ana v3");
    }

    #[test]
    fn test_iteration_is_most_recent_user_first() {
        let events = vec![
            event(1, "A", "Ana", Availability::Enabled),
            event(4, "B", "Bea", Availability::Enabled),
            event(2, "C", "Carla", Availability::Enabled),
            event(3, "A", "Ana", Availability::Disabled),
        ];

        let latest = latest_user_state(events);
        let order: Vec<&str> = latest.iter().map(|u| u.user_id.as_str()).collect();
        assert_eq!(order, vec!["B", "A", "C"]);
    }

    #[test]
    fn test_empty_history() {
        assert!(latest_user_state(Vec::new()).is_empty());
    }

    #[test]
    fn test_malformed_records_are_skipped() {
        let records = vec![
            FeedRecord {
                created_at: "2025-06-01T10:00:00Z".into(),
                field1: Some("A".into()),
                field2: Some("Ana".into()),
                field3: Some("Lopez".into()),
                field4: Some("1".into()),
                ..Default::default()
            },
            FeedRecord {
                created_at: "2025-06-01T11:00:00Z".into(),
                field1: None,
                ..Default::default()
            },
            FeedRecord {
                created_at: "not a date".into(),
                field1: Some("B".into()),
                ..Default::default()
            },
        ];

        let events = user_events_from_records(&records);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].user_id, "A");
    }

    #[test]
    fn test_join_accesses_with_unknown_user() {
        let users = latest_user_state(vec![UserEvent::new(
            t(0),
            "A",
            "Ana",
            "Lopez",
            Availability::Enabled,
        )]);
        let accesses = vec![AccessEvent::new(t(3), "B"), AccessEvent::new(t(5), "A")];

        let rows = join_accesses(&accesses, &users);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].created_at, t(5));
        assert_eq!(rows[0].user_id, "A");
        assert_eq!(rows[0].name, "Ana");
        assert_eq!(rows[0].lastname, "Lopez");
        assert_eq!(rows[1].created_at, t(3));
        assert_eq!(rows[1].user_id, "B");
        assert_eq!(rows[1].name, "-");
        assert_eq!(rows[1].lastname, "-");
        assert!(rows[1].is_unknown_user());
    }

    #[test]
    fn test_sort_recent() {
        let sorted = sort_recent(vec![
            AccessEvent::new(t(1), "A"),
            AccessEvent::new(t(9), "B"),
            AccessEvent::new(t(4), "C"),
        ]);
        let ids: Vec<&str> = sorted.iter().map(|a| a.user_id.as_str()).collect();
        assert_eq!(ids, vec!["B", "C", "A"]);
    }
}
