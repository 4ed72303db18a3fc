//! Action status selection

use serde::Serialize;
use serde_json::Value;

use crate::cache::{ActionStatus, CacheState};
use crate::models::{ActionKind, Id};

/// UI-facing view of the latest create/update/delete attempt.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActionStatusView {
    pub pending: bool,
    pub id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

/// Summarises the `kind` slot of `model`.
///
/// A pending attempt reports only its id; a settled one carries either the
/// response or the error. Unknown models and cleared slots give the default.
pub fn select_action_status(state: &CacheState, model: &str, kind: ActionKind) -> ActionStatusView {
    let Some(status) = state
        .model(model)
        .map(|model_state| model_state.action_status(kind))
    else {
        return ActionStatusView::default();
    };

    match status {
        ActionStatus::Empty => ActionStatusView::default(),
        ActionStatus::Pending { id } => ActionStatusView {
            pending: true,
            id: id.clone(),
            ..ActionStatusView::default()
        },
        ActionStatus::Settled {
            id,
            is_success: true,
            payload,
        } => ActionStatusView {
            pending: false,
            id: id.clone(),
            response: Some(payload.clone()),
            error: None,
        },
        ActionStatus::Settled {
            id,
            is_success: false,
            payload,
        } => ActionStatusView {
            pending: false,
            id: id.clone(),
            response: None,
            error: Some(payload.clone()),
        },
    }
}
