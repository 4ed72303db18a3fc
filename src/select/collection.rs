//! Collection selection

use serde::Serialize;
use serde_json::{Map, Value};

use crate::cache::{CacheState, FetchTime};
use crate::models::Params;
use crate::select::Freshness;

/// Result of [`select_collection`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSelection {
    /// Records in collection order; empty unless resolved
    pub data: Vec<Value>,
    pub other_info: Map<String, Value>,
    pub is_loading: bool,
    pub needs_fetch: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl CollectionSelection {
    fn loading(needs_fetch: bool) -> Self {
        Self {
            is_loading: true,
            needs_fetch,
            ..Self::default()
        }
    }
}

/// Looks up the collection fetched with `params` and resolves its records.
///
/// A collection is only served when it and every record it references
/// are fresh. While anything is in flight the result is loading without
/// asking for another fetch.
pub fn select_collection(
    state: &CacheState,
    model: &str,
    params: &Params,
    freshness: Freshness,
) -> CollectionSelection {
    let Some(model_state) = state.model(model) else {
        return CollectionSelection::loading(true);
    };
    let Some(collection) = model_state.collections().get(params) else {
        return CollectionSelection::loading(true);
    };

    if collection.fetch_time.is_in_flight() {
        return CollectionSelection::loading(false);
    }
    if !freshness.is_fresh(collection.fetch_time) {
        return CollectionSelection::loading(true);
    }
    if let Some(error) = &collection.error {
        return CollectionSelection {
            is_loading: false,
            needs_fetch: false,
            error: Some(error.clone()),
            ..CollectionSelection::default()
        };
    }

    let records = model_state.records();
    let mut data = Vec::with_capacity(collection.ids.len());
    for id in &collection.ids {
        let fetch_time = records
            .get(id)
            .map(|entry| entry.fetch_time)
            .unwrap_or(FetchTime::Unset);
        if !freshness.is_fresh(fetch_time) {
            return CollectionSelection::loading(!fetch_time.is_in_flight());
        }
        let record = records
            .get(id)
            .and_then(|entry| entry.record.clone())
            .unwrap_or(Value::Null);
        data.push(record);
    }

    CollectionSelection {
        data,
        other_info: collection.other_info.clone(),
        is_loading: false,
        needs_fetch: false,
        error: None,
    }
}
