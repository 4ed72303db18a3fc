//! Action Status Module
//!
//! Latest outcome of each mutating operation kind. Only the most recent
//! attempt is kept; a new attempt overwrites the slot.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::models::{ActionKind, Id, ModelEvent};

// == Action Status ==
/// State of one action slot.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ActionStatus {
    /// Nothing attempted since the last clear
    #[default]
    Empty,
    /// Request in flight
    Pending { id: Option<Id> },
    /// Request settled
    Settled {
        id: Option<Id>,
        is_success: bool,
        /// Response body on success, error value on failure
        payload: Value,
    },
}

impl ActionStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, ActionStatus::Pending { .. })
    }

    pub fn id(&self) -> Option<&Id> {
        match self {
            ActionStatus::Empty => None,
            ActionStatus::Pending { id } | ActionStatus::Settled { id, .. } => id.as_ref(),
        }
    }
}

impl Serialize for ActionStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ActionStatus::Empty => serializer.serialize_map(Some(0))?.end(),
            ActionStatus::Pending { id } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("pending", &true)?;
                map.serialize_entry("id", id)?;
                map.end()
            }
            ActionStatus::Settled {
                id,
                is_success,
                payload,
            } => {
                let mut map = serializer.serialize_map(Some(4))?;
                map.serialize_entry("pending", &false)?;
                map.serialize_entry("id", id)?;
                map.serialize_entry("isSuccess", is_success)?;
                map.serialize_entry("payload", payload)?;
                map.end()
            }
        }
    }
}

// == Action Status Tracker ==
/// The create / update / delete slots of one model.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActionStatusTracker {
    create: ActionStatus,
    update: ActionStatus,
    delete: ActionStatus,
}

impl ActionStatusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the slot for `kind`.
    pub fn get(&self, kind: ActionKind) -> &ActionStatus {
        match kind {
            ActionKind::Create => &self.create,
            ActionKind::Update => &self.update,
            ActionKind::Delete => &self.delete,
        }
    }

    fn slot(&mut self, kind: ActionKind) -> &mut ActionStatus {
        match kind {
            ActionKind::Create => &mut self.create,
            ActionKind::Update => &mut self.update,
            ActionKind::Delete => &mut self.delete,
        }
    }

    // == Apply ==
    /// Applies one model event; events that do not concern actions are ignored.
    pub fn apply(&mut self, event: &ModelEvent) {
        let (kind, status) = match event {
            ModelEvent::ClearActionStatus(kind) => (*kind, ActionStatus::Empty),

            ModelEvent::CreateStarted => (ActionKind::Create, ActionStatus::Pending { id: None }),
            ModelEvent::CreateSucceeded { response, .. } => (
                ActionKind::Create,
                ActionStatus::Settled {
                    id: Id::from_record(response.data()).ok(),
                    is_success: true,
                    payload: response.to_value(),
                },
            ),
            ModelEvent::CreateFailed { error, .. } => (
                ActionKind::Create,
                ActionStatus::Settled {
                    id: Id::from_record(error).ok(),
                    is_success: false,
                    payload: error.clone(),
                },
            ),

            ModelEvent::UpdateStarted { id } => (
                ActionKind::Update,
                ActionStatus::Pending {
                    id: Some(id.clone()),
                },
            ),
            ModelEvent::UpdateSucceeded { id, response, .. } => (
                ActionKind::Update,
                settled(id, true, response.to_value()),
            ),
            ModelEvent::UpdateFailed { id, error, .. } => {
                (ActionKind::Update, settled(id, false, error.clone()))
            }

            ModelEvent::DeleteStarted { id } => (
                ActionKind::Delete,
                ActionStatus::Pending {
                    id: Some(id.clone()),
                },
            ),
            ModelEvent::DeleteSucceeded { id, response, .. } => (
                ActionKind::Delete,
                settled(id, true, response.to_value()),
            ),
            ModelEvent::DeleteFailed { id, error, .. } => {
                (ActionKind::Delete, settled(id, false, error.clone()))
            }

            _ => return,
        };
        *self.slot(kind) = status;
    }
}

fn settled(id: &Id, is_success: bool, payload: Value) -> ActionStatus {
    ActionStatus::Settled {
        id: Some(id.clone()),
        is_success,
        payload,
    }
}
