//! Model State Module
//!
//! Everything cached for one resource type: its records, its collections,
//! and the latest create/update/delete outcomes.

use serde::Serialize;

use crate::cache::{ActionStatus, ActionStatusTracker, CollectionStore, RecordStore};
use crate::models::{ActionKind, ModelEvent, Timestamp};

/// Entries removed by one eviction pass over a model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Evicted {
    pub records: usize,
    pub collections: usize,
}

impl Evicted {
    pub fn total(&self) -> usize {
        self.records + self.collections
    }
}

// == Model State ==
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelState {
    by_id: RecordStore,
    collections: CollectionStore,
    action_status: ActionStatusTracker,
}

impl ModelState {
    pub fn new() -> Self {
        Self::default()
    }

    // == Apply ==
    /// Routes `event` to the sub-stores it concerns.
    ///
    /// Each sub-store ignores events it has no rule for, so routing only
    /// needs to single out the reset.
    pub fn apply(&mut self, model: &str, event: &ModelEvent) {
        match event {
            ModelEvent::ClearModelData => *self = Self::default(),
            ModelEvent::FetchStarted { .. }
            | ModelEvent::FetchSucceeded { .. }
            | ModelEvent::FetchFailed { .. } => {
                self.collections.apply(model, event);
                self.by_id.apply(model, event);
            }
            ModelEvent::FetchOneStarted { .. }
            | ModelEvent::FetchOneSucceeded { .. }
            | ModelEvent::FetchOneFailed { .. } => {
                self.by_id.apply(model, event);
            }
            ModelEvent::CreateStarted | ModelEvent::ClearActionStatus(_) => {
                self.action_status.apply(event);
            }
            ModelEvent::CreateSucceeded { .. }
            | ModelEvent::CreateFailed { .. }
            | ModelEvent::DeleteStarted { .. }
            | ModelEvent::DeleteSucceeded { .. }
            | ModelEvent::DeleteFailed { .. } => {
                self.collections.apply(model, event);
                self.by_id.apply(model, event);
                self.action_status.apply(event);
            }
            ModelEvent::UpdateStarted { .. }
            | ModelEvent::UpdateSucceeded { .. }
            | ModelEvent::UpdateFailed { .. } => {
                self.by_id.apply(model, event);
                self.action_status.apply(event);
            }
        }
    }

    // == Garbage Collect ==
    /// Evicts records and collections completed before `now - cache_period`.
    pub fn garbage_collect(&mut self, now: Timestamp, cache_period: u64) -> Evicted {
        Evicted {
            records: self.by_id.cleanup_expired(now, cache_period),
            collections: self.collections.cleanup_expired(now, cache_period),
        }
    }

    pub fn records(&self) -> &RecordStore {
        &self.by_id
    }

    pub fn collections(&self) -> &CollectionStore {
        &self.collections
    }

    /// Raw slot for `kind`.
    pub fn action_status(&self, kind: ActionKind) -> &ActionStatus {
        self.action_status.get(kind)
    }
}
