//! Crud Store
//!
//! Wires the cache state, apply pipeline, dispatcher and garbage collector
//! into one handle.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::info;

use crate::api::{ApiClient, Dispatcher};
use crate::cache::CacheState;
use crate::config::Config;
use crate::error::ApiError;
use crate::models::{ActionKind, CacheEvent, Command, Envelope, Id, Params, Request};
use crate::select::{
    select_action_status, select_collection, select_record, select_record_or_empty,
    ActionStatusView, CollectionSelection, Freshness, RecordSelection,
};
use crate::tasks::{spawn_apply_task, spawn_gc_task, EventSender};

// == Crud Store ==
/// A running cache bound to one [`ApiClient`].
///
/// Must be created inside a Tokio runtime. Background tasks are aborted by
/// [`CrudStore::shutdown`] or when the store is dropped.
pub struct CrudStore<C> {
    config: Config,
    state: Arc<RwLock<CacheState>>,
    events: EventSender,
    dispatcher: Dispatcher<C>,
    pipeline_handle: JoinHandle<()>,
    gc_handle: JoinHandle<()>,
}

impl<C: ApiClient + 'static> CrudStore<C> {
    /// Starts the apply pipeline and the garbage collector.
    ///
    /// # Arguments
    /// * `config` - cache period and collection interval
    /// * `client` - transport used for every dispatched command
    pub fn new(config: Config, client: C) -> Self {
        info!(
            "Starting crud cache: cache period {} ms, gc interval {} ms",
            config.cache_period_ms, config.gc_interval_ms
        );

        let state = Arc::new(RwLock::new(CacheState::new()));
        let (events, receiver) = EventSender::channel();
        let pipeline_handle = spawn_apply_task(state.clone(), receiver);
        let gc_handle = spawn_gc_task(events.clone(), config);
        let dispatcher = Dispatcher::new(Arc::new(client), events.clone());

        Self {
            config,
            state,
            events,
            dispatcher,
            pipeline_handle,
            gc_handle,
        }
    }

    // == Operations ==
    /// Issues a fetch/create/update/delete without waiting for it.
    pub fn dispatch(&self, command: Command) -> JoinHandle<()> {
        self.dispatcher.dispatch(command)
    }

    /// Performs a request whose result is returned to the caller and never
    /// stored.
    pub fn api_call(&self, request: Request) -> JoinHandle<Result<Envelope, ApiError>> {
        self.dispatcher.api_call(request)
    }

    /// Queues an event directly, e.g. a clear.
    pub fn send(&self, event: CacheEvent) -> bool {
        self.events.send(event)
    }

    /// Waits until every event queued so far has been applied.
    pub async fn sync(&self) {
        self.events.sync().await;
    }

    /// Copy of the current state tree.
    pub async fn snapshot(&self) -> CacheState {
        self.state.read().await.clone()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Freshness window at the current time.
    pub fn freshness(&self) -> Freshness {
        Freshness::current(&self.config)
    }

    // == Selection ==
    /// Selections judged against [`CrudStore::freshness`]. The `*_with`
    /// variants take an explicit [`Freshness`], e.g. to override the window
    /// for one query with [`Freshness::with_interval`].
    pub async fn select_collection(&self, model: &str, params: &Params) -> CollectionSelection {
        self.select_collection_with(model, params, self.freshness()).await
    }

    pub async fn select_collection_with(
        &self,
        model: &str,
        params: &Params,
        freshness: Freshness,
    ) -> CollectionSelection {
        let state = self.state.read().await;
        select_collection(&state, model, params, freshness)
    }

    pub async fn select_record(&self, model: &str, id: &Id) -> RecordSelection {
        self.select_record_with(model, id, self.freshness()).await
    }

    pub async fn select_record_with(
        &self,
        model: &str,
        id: &Id,
        freshness: Freshness,
    ) -> RecordSelection {
        let state = self.state.read().await;
        select_record(&state, model, id, freshness)
    }

    /// The fresh record, or `{}` while it is loading or failed.
    pub async fn select_record_or_empty(&self, model: &str, id: &Id) -> Value {
        let state = self.state.read().await;
        select_record_or_empty(&state, model, id, self.freshness())
    }

    pub async fn select_action_status(&self, model: &str, kind: ActionKind) -> ActionStatusView {
        let state = self.state.read().await;
        select_action_status(&state, model, kind)
    }

    /// Stops the background tasks. Queued events not yet applied are lost.
    pub fn shutdown(&self) {
        info!("Shutting down crud cache");
        self.gc_handle.abort();
        self.pipeline_handle.abort();
    }
}

impl<C> Drop for CrudStore<C> {
    fn drop(&mut self) {
        self.gc_handle.abort();
        self.pipeline_handle.abort();
    }
}
