//! Crud Cache - A client-side normalized cache for REST resources
//!
//! Keeps per-model records, parameterized collections and the status of the
//! latest create/update/delete, with TTL freshness and periodic eviction.
//!
//! # Layout
//! - [`cache`] - pure event-apply engine over the state tree
//! - [`select`] - freshness-aware queries over a state snapshot
//! - [`api`] - transport seam and command dispatcher
//! - [`tasks`] - apply pipeline and garbage collector
//! - [`store`] - [`CrudStore`], wiring it all together

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod select;
pub mod store;
pub mod tasks;

pub use api::{ApiClient, Dispatcher, HttpClient};
pub use cache::CacheState;
pub use config::Config;
pub use error::{ApiError, CacheError};
pub use models::{
    ActionKind, CacheEvent, Command, Envelope, Id, Method, ModelEvent, Params, Request,
    ResponseShape,
};
pub use select::{ActionStatusView, CollectionSelection, Freshness, RecordSelection};
pub use store::CrudStore;
