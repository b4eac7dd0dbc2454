use chrono::{DateTime, TimeZone, Utc};
use clave::domain::models::{Availability, UserEvent};
use clave::services::reducer::latest_user_state;
use proptest::prelude::*;
use std::collections::HashMap;

fn event_strategy() -> impl Strategy<Value = UserEvent> {
    (0u8..6, 0i64..500, any::<bool>(), "[a-z]{1,6}").prop_map(|(id, secs, enabled, name)| {
        let available = if enabled {
            Availability::Enabled
        } else {
            Availability::Disabled
        };
        UserEvent::new(ts(secs), format!("U{id}"), name, "Lastname", available)
    })
}

fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_740_000_000 + secs, 0).unwrap()
}

proptest! {
    /// Property: every user id present in the history appears exactly once
    #[test]
    fn prop_one_entry_per_user(events in prop::collection::vec(event_strategy(), 0..60)) {
        let state = latest_user_state(events.clone());

        let mut ids: Vec<&str> = events.iter().map(|e| e.user_id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();

        prop_assert_eq!(state.len(), ids.len());
        for id in ids {
            prop_assert!(state.contains(id));
        }
    }

    /// Property: each entry carries the greatest timestamp seen for its id
    #[test]
    fn prop_entry_is_most_recent_event(events in prop::collection::vec(event_strategy(), 1..60)) {
        let state = latest_user_state(events.clone());

        let mut newest: HashMap<&str, DateTime<Utc>> = HashMap::new();
        for event in &events {
            let entry = newest.entry(event.user_id.as_str()).or_insert(event.created_at);
            if event.created_at > *entry {
                *entry = event.created_at;
            }
        }

        for user in state.iter() {
            prop_assert_eq!(Some(&user.updated_at), newest.get(user.user_id.as_str()));
            let source_exists = events.iter().any(|e| {
                e.user_id == user.user_id
                    && e.created_at == user.updated_at
                    && e.name == user.name
                    && e.available == user.available
            });
            prop_assert!(source_exists);
        }
    }

    /// Property: iteration is ordered most recently updated first
    #[test]
    fn prop_state_ordered_newest_first(events in prop::collection::vec(event_strategy(), 0..60)) {
        let state = latest_user_state(events);
        let stamps: Vec<DateTime<Utc>> = state.iter().map(|u| u.updated_at).collect();
        prop_assert!(stamps.windows(2).all(|w| w[0] >= w[1]));
    }

    /// Property: folding is idempotent and independent of input order
    /// when timestamps are distinct per user
    #[test]
    fn prop_fold_ignores_input_order(events in prop::collection::vec(event_strategy(), 0..40)) {
        let mut seen = std::collections::HashSet::new();
        let distinct: Vec<UserEvent> = events
            .into_iter()
            .filter(|e| seen.insert(e.created_at))
            .collect();

        let forward = latest_user_state(distinct.clone());
        let mut reversed = distinct;
        reversed.reverse();
        let backward = latest_user_state(reversed);

        prop_assert_eq!(forward.as_slice(), backward.as_slice());

        let refolded: Vec<UserEvent> = forward
            .iter()
            .map(|u| UserEvent::new(u.updated_at, u.user_id.clone(), u.name.clone(), u.lastname.clone(), u.available))
            .collect();
        let refolded_state = latest_user_state(refolded);
        prop_assert_eq!(refolded_state.as_slice(), forward.as_slice());
    }
}
