//! Cache State Module
//!
//! Top-level cache: model name to [`ModelState`]. Models are created the
//! first time an event names them and are only ever reset, never removed.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info};

use crate::cache::ModelState;
use crate::models::CacheEvent;

// == Cache State ==
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CacheState {
    models: HashMap<String, ModelState>,
}

impl CacheState {
    pub fn new() -> Self {
        Self::default()
    }

    // == Apply ==
    /// Applies one event in place.
    pub fn apply(&mut self, event: &CacheEvent) {
        match event {
            CacheEvent::Model { model, event } => {
                debug!(model = %model, event = event.name(), "applying event");
                self.models
                    .entry(model.clone())
                    .or_default()
                    .apply(model, event);
            }
            CacheEvent::GarbageCollect { now, cache_period } => {
                let removed: usize = self
                    .models
                    .values_mut()
                    .map(|model| model.garbage_collect(*now, *cache_period).total())
                    .sum();

                if removed > 0 {
                    info!("Cache eviction: removed {} expired entries", removed);
                } else {
                    debug!("Cache eviction: no expired entries found");
                }
            }
        }
    }

    // == Reduce ==
    /// Returns a new state with `event` applied, leaving `self` untouched.
    pub fn reduce(&self, event: &CacheEvent) -> Self {
        let mut next = self.clone();
        next.apply(event);
        next
    }

    /// Returns the state of `model`, if it has ever been referenced.
    pub fn model(&self, model: &str) -> Option<&ModelState> {
        self.models.get(model)
    }

    /// Iterates over the names of known models.
    pub fn model_names(&self) -> impl Iterator<Item = &str> {
        self.models.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{clear_model_data, Envelope, Id, ModelEvent, Params};
    use serde_json::json;

    fn fetch_one(model: &str, id: i64, fetch_time: u64) -> CacheEvent {
        CacheEvent::model(
            model,
            ModelEvent::FetchOneSucceeded {
                id: Id::from(id),
                response: Envelope::Bare(json!({ "id": id })),
                fetch_time,
            },
        )
    }

    #[test]
    fn test_models_created_lazily() {
        let mut state = CacheState::new();
        assert!(state.model("widgets").is_none());

        state.apply(&fetch_one("widgets", 1, 1000));
        assert!(state.model("widgets").is_some());
        assert!(state.model("gadgets").is_none());
    }

    #[test]
    fn test_events_are_routed_by_model() {
        let mut state = CacheState::new();
        state.apply(&fetch_one("widgets", 1, 1000));
        state.apply(&fetch_one("gadgets", 2, 1000));

        let widgets = state.model("widgets").unwrap();
        assert!(widgets.records().get(&Id::from(1)).is_some());
        assert!(widgets.records().get(&Id::from(2)).is_none());

        let mut names: Vec<&str> = state.model_names().collect();
        names.sort();
        assert_eq!(names, vec!["gadgets", "widgets"]);
    }

    #[test]
    fn test_clear_model_data_resets_only_that_model() {
        let mut state = CacheState::new();
        state.apply(&fetch_one("widgets", 1, 1000));
        state.apply(&fetch_one("gadgets", 2, 1000));
        state.apply(&clear_model_data("widgets"));

        assert!(state.model("widgets").unwrap().records().is_empty());
        assert_eq!(state.model("gadgets").unwrap().records().len(), 1);
    }

    #[test]
    fn test_garbage_collect_is_broadcast() {
        let mut state = CacheState::new();
        state.apply(&fetch_one("widgets", 1, 1000));
        state.apply(&fetch_one("gadgets", 2, 1000));
        state.apply(&fetch_one("gadgets", 3, 900_000));

        state.apply(&CacheEvent::GarbageCollect {
            now: 1_000_000,
            cache_period: 600_000,
        });

        assert!(state.model("widgets").unwrap().records().is_empty());
        let gadgets = state.model("gadgets").unwrap();
        assert_eq!(gadgets.records().len(), 1);
        assert!(gadgets.records().get(&Id::from(3)).is_some());
    }

    #[test]
    fn test_garbage_collect_does_not_create_models() {
        let mut state = CacheState::new();
        state.apply(&CacheEvent::GarbageCollect {
            now: 1_000_000,
            cache_period: 600_000,
        });
        assert_eq!(state.model_names().count(), 0);
    }

    #[test]
    fn test_reduce_leaves_input_untouched() {
        let state = CacheState::new();
        let event = CacheEvent::model(
            "widgets",
            ModelEvent::FetchStarted {
                params: Some(Params::new()),
            },
        );
        let next = state.reduce(&event);
        assert!(state.model("widgets").is_none());
        assert_eq!(next.model("widgets").unwrap().collections().len(), 1);
    }
}
