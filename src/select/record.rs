//! Record selection

use serde_json::{json, Map, Value};

use crate::cache::CacheState;
use crate::models::Id;
use crate::select::Freshness;

/// Message carried by the placeholder error of a loading record.
pub const LOADING_MESSAGE: &str = "Loading...";

/// Result of [`select_record`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordSelection {
    /// Fresh record data
    Record(Value),
    /// Missing, stale, or in flight
    Loading { needs_fetch: bool },
    /// The last fetch failed with this error
    Failed(Value),
}

impl RecordSelection {
    pub fn is_loading(&self) -> bool {
        matches!(self, RecordSelection::Loading { .. })
    }

    pub fn needs_fetch(&self) -> bool {
        matches!(self, RecordSelection::Loading { needs_fetch: true })
    }

    /// The record, if one can be served.
    pub fn record(&self) -> Option<&Value> {
        match self {
            RecordSelection::Record(record) => Some(record),
            _ => None,
        }
    }

    /// The stored error, or a `Loading...` placeholder while loading.
    pub fn error(&self) -> Option<Value> {
        match self {
            RecordSelection::Record(_) => None,
            RecordSelection::Loading { .. } => Some(json!({ "message": LOADING_MESSAGE })),
            RecordSelection::Failed(error) => Some(error.clone()),
        }
    }
}

/// Looks up one record by id.
pub fn select_record(
    state: &CacheState,
    model: &str,
    id: &Id,
    freshness: Freshness,
) -> RecordSelection {
    let Some(entry) = state
        .model(model)
        .and_then(|model_state| model_state.records().get(id))
    else {
        return RecordSelection::Loading { needs_fetch: true };
    };

    if entry.fetch_time.is_in_flight() {
        return RecordSelection::Loading { needs_fetch: false };
    }
    if !freshness.is_fresh(entry.fetch_time) {
        return RecordSelection::Loading { needs_fetch: true };
    }
    if let Some(error) = &entry.error {
        return RecordSelection::Failed(error.clone());
    }
    RecordSelection::Record(entry.record.clone().unwrap_or(Value::Null))
}

/// Like [`select_record`], but yields `{}` instead of a loading or error
/// placeholder.
pub fn select_record_or_empty(
    state: &CacheState,
    model: &str,
    id: &Id,
    freshness: Freshness,
) -> Value {
    match select_record(state, model, id, freshness) {
        RecordSelection::Record(record) => record,
        _ => Value::Object(Map::new()),
    }
}
