//! Background Tasks Module
//!
//! Long-running tasks that keep the cache moving.
//!
//! # Tasks
//! - Apply pipeline: applies cache events one at a time, in send order
//! - Garbage collection: emits eviction events at the configured interval

mod gc;
mod pipeline;

pub use gc::spawn_gc_task;
pub use pipeline::{spawn_apply_task, EventReceiver, EventSender};
