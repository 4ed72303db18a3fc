//! Cache events
//!
//! Everything that changes the cache arrives as a [`CacheEvent`]. Request
//! lifecycles produce a `*Started` event when issued and exactly one
//! `*Succeeded` or `*Failed` event when the transport settles.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::models::{Envelope, Id, Params};

/// Epoch milliseconds.
pub type Timestamp = u64;

/// Error payload stored in the cache, usually the server's error body.
pub type ErrorValue = Value;

/// The mutating operations whose latest outcome is tracked per model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Create,
    Update,
    Delete,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Create => "create",
            ActionKind::Update => "update",
            ActionKind::Delete => "delete",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// == Model Event ==
/// An event addressed to one model.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelEvent {
    /// Collection fetch issued
    FetchStarted { params: Option<Params> },
    /// Collection fetch answered
    FetchSucceeded {
        params: Option<Params>,
        response: Envelope,
        fetch_time: Timestamp,
    },
    /// Collection fetch failed
    FetchFailed {
        params: Option<Params>,
        error: ErrorValue,
        fetch_time: Timestamp,
    },

    /// Single record fetch issued
    FetchOneStarted { id: Id },
    /// Single record fetch answered
    FetchOneSucceeded {
        id: Id,
        response: Envelope,
        fetch_time: Timestamp,
    },
    /// Single record fetch failed
    FetchOneFailed {
        id: Id,
        error: ErrorValue,
        fetch_time: Timestamp,
    },

    /// Create issued; the server has not assigned an id yet
    CreateStarted,
    /// Create answered with the stored record
    CreateSucceeded {
        response: Envelope,
        fetch_time: Timestamp,
    },
    /// Create failed
    CreateFailed {
        error: ErrorValue,
        fetch_time: Timestamp,
    },

    /// Update issued
    UpdateStarted { id: Id },
    /// Update answered with the stored record
    UpdateSucceeded {
        id: Id,
        response: Envelope,
        fetch_time: Timestamp,
    },
    /// Update failed
    UpdateFailed {
        id: Id,
        error: ErrorValue,
        fetch_time: Timestamp,
    },

    /// Delete issued
    DeleteStarted { id: Id },
    /// Delete answered
    DeleteSucceeded {
        id: Id,
        response: Envelope,
        fetch_time: Timestamp,
    },
    /// Delete failed
    DeleteFailed {
        id: Id,
        error: ErrorValue,
        fetch_time: Timestamp,
    },

    /// Forget the latest outcome of one action kind
    ClearActionStatus(ActionKind),
    /// Drop everything cached for the model
    ClearModelData,
}

impl ModelEvent {
    /// Short name used in log lines.
    pub fn name(&self) -> &'static str {
        match self {
            ModelEvent::FetchStarted { .. } => "fetch",
            ModelEvent::FetchSucceeded { .. } => "fetch_success",
            ModelEvent::FetchFailed { .. } => "fetch_error",
            ModelEvent::FetchOneStarted { .. } => "fetch_one",
            ModelEvent::FetchOneSucceeded { .. } => "fetch_one_success",
            ModelEvent::FetchOneFailed { .. } => "fetch_one_error",
            ModelEvent::CreateStarted => "create",
            ModelEvent::CreateSucceeded { .. } => "create_success",
            ModelEvent::CreateFailed { .. } => "create_error",
            ModelEvent::UpdateStarted { .. } => "update",
            ModelEvent::UpdateSucceeded { .. } => "update_success",
            ModelEvent::UpdateFailed { .. } => "update_error",
            ModelEvent::DeleteStarted { .. } => "delete",
            ModelEvent::DeleteSucceeded { .. } => "delete_success",
            ModelEvent::DeleteFailed { .. } => "delete_error",
            ModelEvent::ClearActionStatus(_) => "clear_action_status",
            ModelEvent::ClearModelData => "clear_model_data",
        }
    }
}

// == Cache Event ==
/// An event consumed by the top-level cache.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheEvent {
    /// Routed to the named model, creating it if unseen
    Model { model: String, event: ModelEvent },
    /// Broadcast to every model: prune entries completed before
    /// `now - cache_period`
    GarbageCollect { now: Timestamp, cache_period: u64 },
}

impl CacheEvent {
    /// Addresses `event` to `model`.
    pub fn model(model: impl Into<String>, event: ModelEvent) -> Self {
        CacheEvent::Model {
            model: model.into(),
            event,
        }
    }
}

/// Builds the event that forgets the latest `kind` outcome for `model`.
pub fn clear_action_status(model: impl Into<String>, kind: ActionKind) -> CacheEvent {
    CacheEvent::model(model, ModelEvent::ClearActionStatus(kind))
}

/// Builds the event that resets `model` to empty.
pub fn clear_model_data(model: impl Into<String>) -> CacheEvent {
    CacheEvent::model(model, ModelEvent::ClearModelData)
}
