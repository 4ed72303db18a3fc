//! Commands
//!
//! A [`Command`] names a cache-tracked REST operation: which model it
//! belongs to, what it does, and the request that performs it. It knows
//! which events bracket its lifecycle.

use serde_json::Value;

use crate::error::ApiError;
use crate::models::{CacheEvent, Envelope, Id, Method, ModelEvent, Params, Request, Timestamp};

/// The cache-visible operation a command performs.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandKind {
    /// List query keyed by its params
    FetchCollection { params: Params },
    /// Single record read
    FetchRecord { id: Id },
    /// Record creation
    Create,
    /// Record replacement
    Update { id: Id },
    /// Record removal
    Delete { id: Id },
}

/// A REST operation whose outcome is written into the cache.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    model: String,
    kind: CommandKind,
    request: Request,
}

impl Command {
    /// GET a collection; `params` are both the query string and the
    /// collection's identity.
    pub fn fetch_collection(model: impl Into<String>, path: impl Into<String>, params: Params) -> Self {
        Self {
            model: model.into(),
            request: Request::new(Method::Get, path).with_params(params.clone()),
            kind: CommandKind::FetchCollection { params },
        }
    }

    /// GET one record.
    pub fn fetch_record(model: impl Into<String>, id: Id, path: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            kind: CommandKind::FetchRecord { id },
            request: Request::new(Method::Get, path),
        }
    }

    /// POST a new record.
    pub fn create_record(model: impl Into<String>, path: impl Into<String>, data: Value) -> Self {
        Self {
            model: model.into(),
            kind: CommandKind::Create,
            request: Request::new(Method::Post, path).with_data(data),
        }
    }

    /// PUT a record.
    pub fn update_record(
        model: impl Into<String>,
        id: Id,
        path: impl Into<String>,
        data: Value,
    ) -> Self {
        Self {
            model: model.into(),
            kind: CommandKind::Update { id },
            request: Request::new(Method::Put, path).with_data(data),
        }
    }

    /// DELETE a record.
    pub fn delete_record(model: impl Into<String>, id: Id, path: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            kind: CommandKind::Delete { id },
            request: Request::new(Method::Delete, path),
        }
    }

    /// Overrides the default HTTP method (e.g. PATCH for updates).
    pub fn with_method(mut self, method: Method) -> Self {
        self.request.method = method;
        self
    }

    /// Sets query params for commands other than collection fetches.
    ///
    /// A collection fetch keeps its params as its identity; extra query
    /// params would make two different queries share one cache entry, so
    /// they are merged into both.
    pub fn with_query(mut self, query: Params) -> Self {
        if let CommandKind::FetchCollection { params } = &mut self.kind {
            for (key, value) in query.as_map() {
                params.insert(key.clone(), value.clone());
            }
            self.request.params = params.clone();
        } else {
            self.request.params = query;
        }
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn kind(&self) -> &CommandKind {
        &self.kind
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    /// The event that marks this command as in flight.
    pub fn started_event(&self) -> CacheEvent {
        let event = match &self.kind {
            CommandKind::FetchCollection { params } => ModelEvent::FetchStarted {
                params: Some(params.clone()),
            },
            CommandKind::FetchRecord { id } => ModelEvent::FetchOneStarted { id: id.clone() },
            CommandKind::Create => ModelEvent::CreateStarted,
            CommandKind::Update { id } => ModelEvent::UpdateStarted { id: id.clone() },
            CommandKind::Delete { id } => ModelEvent::DeleteStarted { id: id.clone() },
        };
        CacheEvent::model(self.model.clone(), event)
    }

    /// The event that settles this command with the transport's result.
    pub fn completion_event(
        &self,
        result: Result<Envelope, ApiError>,
        fetch_time: Timestamp,
    ) -> CacheEvent {
        let event = match (result, &self.kind) {
            (Ok(response), CommandKind::FetchCollection { params }) => {
                ModelEvent::FetchSucceeded {
                    params: Some(params.clone()),
                    response,
                    fetch_time,
                }
            }
            (Err(err), CommandKind::FetchCollection { params }) => ModelEvent::FetchFailed {
                params: Some(params.clone()),
                error: err.to_value(),
                fetch_time,
            },
            (Ok(response), CommandKind::FetchRecord { id }) => ModelEvent::FetchOneSucceeded {
                id: id.clone(),
                response,
                fetch_time,
            },
            (Err(err), CommandKind::FetchRecord { id }) => ModelEvent::FetchOneFailed {
                id: id.clone(),
                error: err.to_value(),
                fetch_time,
            },
            (Ok(response), CommandKind::Create) => ModelEvent::CreateSucceeded {
                response,
                fetch_time,
            },
            (Err(err), CommandKind::Create) => ModelEvent::CreateFailed {
                error: err.to_value(),
                fetch_time,
            },
            (Ok(response), CommandKind::Update { id }) => ModelEvent::UpdateSucceeded {
                id: id.clone(),
                response,
                fetch_time,
            },
            (Err(err), CommandKind::Update { id }) => ModelEvent::UpdateFailed {
                id: id.clone(),
                error: err.to_value(),
                fetch_time,
            },
            (Ok(response), CommandKind::Delete { id }) => ModelEvent::DeleteSucceeded {
                id: id.clone(),
                response,
                fetch_time,
            },
            (Err(err), CommandKind::Delete { id }) => ModelEvent::DeleteFailed {
                id: id.clone(),
                error: err.to_value(),
                fetch_time,
            },
        };
        CacheEvent::model(self.model.clone(), event)
    }
}
