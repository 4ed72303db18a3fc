//! Cache Module
//!
//! The normalized cache engine: per-model record, collection and action
//! status stores, composed under a top-level state keyed by model name.

mod action_status;
mod collection_store;
mod fetch_time;
mod model;
mod record_store;
mod state;


// Re-export public types
pub use action_status::{ActionStatus, ActionStatusTracker};
pub use collection_store::{Collection, CollectionStore};
pub use fetch_time::{current_timestamp_ms, FetchTime};
pub use model::{Evicted, ModelState};
pub use record_store::{RecordEntry, RecordStore};
pub use state::CacheState;
