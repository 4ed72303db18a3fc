//! Collection Store Module
//!
//! Cached query results, each identified by the params of the request that
//! produced it. Collections hold ordered id references into the record
//! store rather than the records themselves.

use std::collections::HashMap;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::warn;

use crate::cache::FetchTime;
use crate::models::{Envelope, Id, ModelEvent, Params, ParamsKey, Timestamp};

// == Collection ==
/// One cached query result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub params: Params,
    pub ids: Vec<Id>,
    /// Response metadata without the `data` array
    pub other_info: Map<String, Value>,
    pub fetch_time: FetchTime,
    pub error: Option<Value>,
}

impl Collection {
    fn new(params: Params) -> Self {
        Self {
            params,
            ids: Vec::new(),
            other_info: Map::new(),
            fetch_time: FetchTime::Unset,
            error: None,
        }
    }

    fn apply(&mut self, model: &str, event: &ModelEvent) {
        match event {
            ModelEvent::FetchStarted { .. } => {
                self.fetch_time = FetchTime::InFlight;
                self.error = None;
            }
            ModelEvent::FetchSucceeded {
                response,
                fetch_time,
                ..
            } => {
                self.ids = extract_ids(model, response);
                self.other_info = response.other_info();
                self.error = None;
                self.fetch_time = FetchTime::At(*fetch_time);
            }
            ModelEvent::FetchFailed {
                error, fetch_time, ..
            } => {
                self.error = Some(error.clone());
                self.fetch_time = FetchTime::At(*fetch_time);
            }
            _ => {}
        }
    }
}

/// Collects the ids of a fetched record list in response order.
fn extract_ids(model: &str, response: &Envelope) -> Vec<Id> {
    let Some(records) = response.records() else {
        warn!(
            model,
            payload = %response.to_value(),
            "collection payload is not an array; expected [ ... ] or {{ data: [ ... ] }}"
        );
        return Vec::new();
    };

    records
        .iter()
        .filter_map(|record| match Id::from_record(record) {
            Ok(id) => Some(id),
            Err(err) => {
                warn!(model, %err, %record, "collection member has no usable id, skipping");
                None
            }
        })
        .collect()
}

// == Collection Store ==
/// Ordered collections with a canonical-params index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionStore {
    collections: Vec<Collection>,
    index: HashMap<ParamsKey, usize>,
}

impl CollectionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // == Apply ==
    /// Applies one model event; events that do not concern collections are ignored.
    pub fn apply(&mut self, model: &str, event: &ModelEvent) {
        match event {
            ModelEvent::FetchStarted { params }
            | ModelEvent::FetchSucceeded { params, .. }
            | ModelEvent::FetchFailed { params, .. } => {
                // a collection cannot be keyed by an absent query
                let Some(params) = params else {
                    return;
                };
                self.entry(params).apply(model, event);
            }
            ModelEvent::CreateSucceeded { .. } | ModelEvent::DeleteSucceeded { .. } => {
                self.invalidate_all();
            }
            _ => {}
        }
    }

    /// Returns the collection for `params`, creating an empty one if needed.
    fn entry(&mut self, params: &Params) -> &mut Collection {
        let key = params.key();
        let idx = match self.index.get(&key) {
            Some(&idx) => idx,
            None => {
                self.collections.push(Collection::new(params.clone()));
                let idx = self.collections.len() - 1;
                self.index.insert(key, idx);
                idx
            }
        };
        &mut self.collections[idx]
    }

    // == Invalidate ==
    /// Marks every collection as needing a refetch.
    pub fn invalidate_all(&mut self) {
        for collection in &mut self.collections {
            collection.fetch_time = FetchTime::Unset;
        }
    }

    // == Cleanup Expired ==
    /// Drops completed collections older than `now - cache_period`.
    ///
    /// Unset and in-flight collections are always kept. Returns the number
    /// of collections removed.
    pub fn cleanup_expired(&mut self, now: Timestamp, cache_period: u64) -> usize {
        let before = self.collections.len();
        self.collections.retain(|collection| match collection.fetch_time {
            FetchTime::Unset | FetchTime::InFlight => true,
            completed => !completed.is_expired(now, cache_period),
        });
        let removed = before - self.collections.len();
        if removed > 0 {
            self.rebuild_index();
        }
        removed
    }

    fn rebuild_index(&mut self) {
        self.index = self
            .collections
            .iter()
            .enumerate()
            .map(|(idx, collection)| (collection.params.key(), idx))
            .collect();
    }

    // == Get ==
    /// Returns the collection whose params equal `params`.
    pub fn get(&self, params: &Params) -> Option<&Collection> {
        self.index
            .get(&params.key())
            .map(|&idx| &self.collections[idx])
    }

    /// Iterates collections in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Collection> {
        self.collections.iter()
    }

    // == Length ==
    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}

impl Serialize for CollectionStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.collections.serialize(serializer)
    }
}
