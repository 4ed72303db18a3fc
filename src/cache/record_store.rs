//! Record Store Module
//!
//! Per-id cache of individual resource records. Server data is canonical:
//! every successful response replaces whatever was cached for that id.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::cache::FetchTime;
use crate::models::{Envelope, Id, ModelEvent, Timestamp};

// == Record Entry ==
/// One cached record with its freshness and error state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordEntry {
    pub fetch_time: FetchTime,
    pub error: Option<Value>,
    pub record: Option<Value>,
}

impl RecordEntry {
    fn in_flight() -> Self {
        Self {
            fetch_time: FetchTime::InFlight,
            error: None,
            record: None,
        }
    }

    fn loaded(record: Value, fetch_time: Timestamp) -> Self {
        Self {
            fetch_time: FetchTime::At(fetch_time),
            error: None,
            record: Some(record),
        }
    }

    fn failed(error: Value, fetch_time: Timestamp) -> Self {
        Self {
            fetch_time: FetchTime::At(fetch_time),
            error: Some(error),
            record: None,
        }
    }
}

// == Record Store ==
/// Map from record id to cached record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RecordStore {
    entries: HashMap<Id, RecordEntry>,
}

impl RecordStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // == Apply ==
    /// Applies one model event; events that do not concern records are ignored.
    pub fn apply(&mut self, model: &str, event: &ModelEvent) {
        match event {
            ModelEvent::FetchSucceeded {
                response,
                fetch_time,
                ..
            } => {
                // a non-array payload is reported by the collection store
                let Some(records) = response.records() else {
                    return;
                };
                for record in records {
                    match Id::from_record(record) {
                        Ok(id) => {
                            self.entries
                                .insert(id, RecordEntry::loaded(record.clone(), *fetch_time));
                        }
                        Err(err) => {
                            warn!(model, %err, %record, "fetched record has no usable id, skipping");
                        }
                    }
                }
            }
            ModelEvent::FetchOneStarted { id } => {
                self.entries.insert(id.clone(), RecordEntry::in_flight());
            }
            ModelEvent::FetchOneSucceeded {
                id,
                response,
                fetch_time,
            }
            | ModelEvent::UpdateSucceeded {
                id,
                response,
                fetch_time,
            } => {
                self.entries.insert(
                    id.clone(),
                    RecordEntry::loaded(response.data().clone(), *fetch_time),
                );
            }
            ModelEvent::FetchOneFailed {
                id,
                error,
                fetch_time,
            } => {
                self.entries
                    .insert(id.clone(), RecordEntry::failed(error.clone(), *fetch_time));
            }
            ModelEvent::CreateSucceeded {
                response,
                fetch_time,
            } => self.insert_created(model, response, *fetch_time),
            ModelEvent::UpdateStarted { id } => {
                // unknown ids stay unknown: there is nothing to mark in flight
                if let Some(entry) = self.entries.get_mut(id) {
                    entry.fetch_time = FetchTime::InFlight;
                }
            }
            ModelEvent::UpdateFailed {
                id,
                error,
                fetch_time,
            } => {
                // settles the in-flight marker left by UpdateStarted
                if let Some(entry) = self.entries.get_mut(id) {
                    *entry = RecordEntry::failed(error.clone(), *fetch_time);
                }
            }
            ModelEvent::DeleteSucceeded { id, .. } => {
                self.entries.remove(id);
            }
            _ => {}
        }
    }

    fn insert_created(&mut self, model: &str, response: &Envelope, fetch_time: Timestamp) {
        let record = response.data();
        match Id::from_record(record) {
            Ok(id) => {
                self.entries
                    .insert(id, RecordEntry::loaded(record.clone(), fetch_time));
            }
            Err(err) => {
                warn!(model, %err, %record, "created record has no usable id, not cached");
            }
        }
    }

    // == Cleanup Expired ==
    /// Removes every entry completed before `now - cache_period`.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self, now: Timestamp, cache_period: u64) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| !entry.fetch_time.is_expired(now, cache_period));
        before - self.entries.len()
    }

    // == Get ==
    /// Returns the entry for `id`, if cached.
    pub fn get(&self, id: &Id) -> Option<&RecordEntry> {
        self.entries.get(id)
    }

    // == Length ==
    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Params, ResponseShape};
    use serde_json::json;

    const MODEL: &str = "widgets";

    fn fetched(body: Value, shape: ResponseShape, fetch_time: Timestamp) -> ModelEvent {
        ModelEvent::FetchSucceeded {
            params: Some(Params::new()),
            response: shape.decode(body),
            fetch_time,
        }
    }

    #[test]
    fn test_fetch_success_bare_array() {
        let mut store = RecordStore::new();
        store.apply(
            MODEL,
            &fetched(json!([{"id": 1}, {"id": 2}]), ResponseShape::Bare, 1000),
        );

        assert_eq!(store.len(), 2);
        let entry = store.get(&Id::from(1)).unwrap();
        assert_eq!(entry.fetch_time, FetchTime::At(1000));
        assert_eq!(entry.record, Some(json!({"id": 1})));
        assert!(entry.error.is_none());
    }

    #[test]
    fn test_fetch_success_envelope() {
        let mut store = RecordStore::new();
        store.apply(
            MODEL,
            &fetched(
                json!({"data": [{"id": "a"}], "count": 1}),
                ResponseShape::Wrapped,
                1000,
            ),
        );
        assert_eq!(
            store.get(&Id::parse("a").unwrap()).unwrap().record,
            Some(json!({"id": "a"}))
        );
    }

    #[test]
    fn test_fetch_success_replaces_instead_of_merging() {
        let mut store = RecordStore::new();
        store.apply(
            MODEL,
            &fetched(json!([{"id": 1, "name": "one", "extra": true}]), ResponseShape::Bare, 1000),
        );
        store.apply(
            MODEL,
            &fetched(json!([{"id": 1, "name": "uno"}]), ResponseShape::Bare, 2000),
        );

        let entry = store.get(&Id::from(1)).unwrap();
        assert_eq!(entry.record, Some(json!({"id": 1, "name": "uno"})));
        assert_eq!(entry.fetch_time, FetchTime::At(2000));
    }

    #[test]
    fn test_fetch_success_skips_records_without_id() {
        let mut store = RecordStore::new();
        store.apply(
            MODEL,
            &fetched(json!([{"name": "anonymous"}, {"id": 2}]), ResponseShape::Bare, 1000),
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_fetch_success_non_array_is_ignored() {
        let mut store = RecordStore::new();
        store.apply(MODEL, &fetched(json!({"id": 1}), ResponseShape::Bare, 1000));
        assert!(store.is_empty());
    }

    #[test]
    fn test_fetch_one_lifecycle() {
        let mut store = RecordStore::new();
        let id = Id::from(3);

        store.apply(MODEL, &ModelEvent::FetchOneStarted { id: id.clone() });
        assert_eq!(store.get(&id).unwrap(), &RecordEntry::in_flight());

        store.apply(
            MODEL,
            &ModelEvent::FetchOneSucceeded {
                id: id.clone(),
                response: Envelope::Bare(json!({"id": 3, "name": "three"})),
                fetch_time: 5000,
            },
        );
        let entry = store.get(&id).unwrap();
        assert_eq!(entry.fetch_time, FetchTime::At(5000));
        assert_eq!(entry.record, Some(json!({"id": 3, "name": "three"})));
    }

    #[test]
    fn test_fetch_one_failure_clears_record() {
        let mut store = RecordStore::new();
        let id = Id::from(3);
        store.apply(
            MODEL,
            &ModelEvent::FetchOneSucceeded {
                id: id.clone(),
                response: Envelope::Bare(json!({"id": 3})),
                fetch_time: 1000,
            },
        );
        store.apply(
            MODEL,
            &ModelEvent::FetchOneFailed {
                id: id.clone(),
                error: json!({"message": "gone"}),
                fetch_time: 2000,
            },
        );

        let entry = store.get(&id).unwrap();
        assert_eq!(entry.record, None);
        assert_eq!(entry.error, Some(json!({"message": "gone"})));
        assert_eq!(entry.fetch_time, FetchTime::At(2000));
    }

    #[test]
    fn test_create_success_uses_server_id() {
        let mut store = RecordStore::new();
        store.apply(
            MODEL,
            &ModelEvent::CreateSucceeded {
                response: Envelope::Bare(json!({"id": 5, "name": "x"})),
                fetch_time: 1000,
            },
        );
        assert_eq!(
            store.get(&Id::from(5)).unwrap().record,
            Some(json!({"id": 5, "name": "x"}))
        );
    }

    #[test]
    fn test_create_success_without_id_is_not_cached() {
        let mut store = RecordStore::new();
        store.apply(
            MODEL,
            &ModelEvent::CreateSucceeded {
                response: Envelope::Bare(json!({"name": "x"})),
                fetch_time: 1000,
            },
        );
        assert!(store.is_empty());
    }

    #[test]
    fn test_update_start_preserves_record() {
        let mut store = RecordStore::new();
        let id = Id::from(1);
        store.apply(MODEL, &fetched(json!([{"id": 1}]), ResponseShape::Bare, 1000));
        store.apply(MODEL, &ModelEvent::UpdateStarted { id: id.clone() });

        let entry = store.get(&id).unwrap();
        assert_eq!(entry.fetch_time, FetchTime::InFlight);
        assert_eq!(entry.record, Some(json!({"id": 1})));
    }

    #[test]
    fn test_update_start_on_unknown_id_is_noop() {
        let mut store = RecordStore::new();
        store.apply(MODEL, &ModelEvent::UpdateStarted { id: Id::from(9) });
        assert!(store.is_empty());
        assert!(store.get(&Id::from(9)).is_none());
    }

    #[test]
    fn test_update_failure_settles_in_flight_marker() {
        let mut store = RecordStore::new();
        let id = Id::from(1);
        store.apply(MODEL, &fetched(json!([{"id": 1}, {"id": 2}]), ResponseShape::Bare, 1000));
        store.apply(MODEL, &ModelEvent::UpdateStarted { id: id.clone() });
        store.apply(
            MODEL,
            &ModelEvent::UpdateFailed {
                id: id.clone(),
                error: json!({"message": "conflict"}),
                fetch_time: 2000,
            },
        );

        let entry = store.get(&id).unwrap();
        assert_eq!(entry.fetch_time, FetchTime::At(2000));
        assert_eq!(entry.error, Some(json!({"message": "conflict"})));
        assert_eq!(entry.record, None);

        // no longer pinned in flight, so eviction can reach it
        let three_days = 3 * 24 * 60 * 60 * 1000;
        assert_eq!(store.cleanup_expired(2000 + three_days, 600_000), 2);
        assert!(store.is_empty());
    }

    #[test]
    fn test_update_failure_on_unknown_id_is_noop() {
        let mut store = RecordStore::new();
        store.apply(
            MODEL,
            &ModelEvent::UpdateFailed {
                id: Id::from(9),
                error: json!({"message": "not found"}),
                fetch_time: 2000,
            },
        );
        assert!(store.is_empty());
    }

    #[test]
    fn test_update_success_unwraps_envelope() {
        let mut store = RecordStore::new();
        let id = Id::from(1);
        store.apply(
            MODEL,
            &ModelEvent::UpdateSucceeded {
                id: id.clone(),
                response: ResponseShape::Wrapped
                    .decode(json!({"data": {"id": 1, "name": "new"}, "version": 2})),
                fetch_time: 3000,
            },
        );
        let entry = store.get(&id).unwrap();
        assert_eq!(entry.record, Some(json!({"id": 1, "name": "new"})));
        assert_eq!(entry.fetch_time, FetchTime::At(3000));
    }

    #[test]
    fn test_delete_success_removes_entry() {
        let mut store = RecordStore::new();
        store.apply(
            MODEL,
            &fetched(json!([{"id": 3}, {"id": 4}]), ResponseShape::Bare, 1000),
        );
        store.apply(
            MODEL,
            &ModelEvent::DeleteSucceeded {
                id: Id::from(3),
                response: Envelope::Bare(Value::Null),
                fetch_time: 2000,
            },
        );
        assert!(store.get(&Id::from(3)).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_cleanup_expired() {
        let mut store = RecordStore::new();
        store.apply(MODEL, &fetched(json!([{"id": 1}]), ResponseShape::Bare, 1000));
        store.apply(MODEL, &fetched(json!([{"id": 2}]), ResponseShape::Bare, 9000));
        store.apply(MODEL, &ModelEvent::FetchOneStarted { id: Id::from(3) });

        let removed = store.cleanup_expired(10_000, 5000);
        assert_eq!(removed, 1);
        assert!(store.get(&Id::from(1)).is_none());
        assert!(store.get(&Id::from(2)).is_some());
        assert!(store.get(&Id::from(3)).is_some());
    }

    #[test]
    fn test_unrelated_events_are_ignored() {
        let mut store = RecordStore::new();
        store.apply(MODEL, &ModelEvent::CreateStarted);
        store.apply(
            MODEL,
            &ModelEvent::FetchStarted {
                params: Some(Params::new()),
            },
        );
        assert!(store.is_empty());
    }
}
