//! Command dispatcher
//!
//! Sends a command's start event synchronously, then runs its request on a
//! spawned task and reports the outcome as a completion event.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::cache::current_timestamp_ms;
use crate::error::ApiError;
use crate::models::{Command, Envelope, Request};
use crate::tasks::EventSender;

// == Dispatcher ==
pub struct Dispatcher<C> {
    client: Arc<C>,
    events: EventSender,
}

impl<C> Clone for Dispatcher<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            events: self.events.clone(),
        }
    }
}

impl<C: ApiClient + 'static> Dispatcher<C> {
    pub fn new(client: Arc<C>, events: EventSender) -> Self {
        Self { client, events }
    }

    /// Issues `command` without waiting for it.
    ///
    /// The start event is queued before this returns, so a selection made
    /// after the next pipeline sync already sees the in-flight marker. The
    /// completion event carries the time the response arrived.
    ///
    /// # Returns
    /// Handle of the request task; awaiting it is optional.
    pub fn dispatch(&self, command: Command) -> JoinHandle<()> {
        self.events.send(command.started_event());

        let client = Arc::clone(&self.client);
        let events = self.events.clone();
        tokio::spawn(async move {
            let request = command.request().clone();
            debug!(
                model = command.model(),
                method = %request.method,
                path = %request.path,
                "dispatching request"
            );

            let result = client.call(request).await;
            if let Err(err) = &result {
                warn!(model = command.model(), error = %err, "request failed");
            }

            events.send(command.completion_event(result, current_timestamp_ms()));
        })
    }

    /// Performs an arbitrary request outside the cache.
    ///
    /// Nothing is recorded in the cache; the caller receives the result.
    pub fn api_call(&self, request: Request) -> JoinHandle<Result<Envelope, ApiError>> {
        let client = Arc::clone(&self.client);
        tokio::spawn(async move {
            debug!(method = %request.method, path = %request.path, "api call");
            client.call(request).await
        })
    }
}
