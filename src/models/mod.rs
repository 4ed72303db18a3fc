//! Data types shared across the cache
//!
//! Identifiers, params, response envelopes, events, and the request
//! descriptors handed to the transport.

pub mod command;
pub mod envelope;
pub mod event;
pub mod id;
pub mod params;
pub mod request;

// Re-export commonly used types
pub use command::{Command, CommandKind};
pub use envelope::{Envelope, ResponseShape};
pub use event::{
    clear_action_status, clear_model_data, ActionKind, CacheEvent, ErrorValue, ModelEvent,
    Timestamp,
};
pub use id::Id;
pub use params::{Params, ParamsKey};
pub use request::{Method, Request};
