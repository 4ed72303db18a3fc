//! Garbage Collection Task
//!
//! Background timer that periodically asks the cache to evict expired
//! records and collections.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::current_timestamp_ms;
use crate::config::Config;
use crate::models::CacheEvent;
use crate::tasks::EventSender;

/// Spawns a background task that emits garbage-collect events.
///
/// The task waits an initial delay of one cache period, then emits an event
/// every `gc_interval_ms`, so the first event fires at cache period plus one
/// interval. Each event carries the wall-clock time it was emitted and the
/// configured cache period as the eviction cutoff.
///
/// # Arguments
/// * `events` - sender feeding the apply pipeline
/// * `config` - cache period and collection interval
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during shutdown. The task also ends on its own once the pipeline closes.
///
/// # Example
/// ```ignore
/// let (events, receiver) = EventSender::channel();
/// let gc_handle = spawn_gc_task(events.clone(), Config::from_env());
/// // Later, during shutdown:
/// gc_handle.abort();
/// ```
pub fn spawn_gc_task(events: EventSender, config: Config) -> JoinHandle<()> {
    let initial_delay = Duration::from_millis(config.cache_period_ms);
    let interval = Duration::from_millis(config.gc_interval_ms);

    tokio::spawn(async move {
        info!(
            "Starting garbage collection task: initial delay {} ms, then every {} ms",
            config.cache_period_ms, config.gc_interval_ms
        );

        tokio::time::sleep(initial_delay).await;

        loop {
            tokio::time::sleep(interval).await;

            let event = CacheEvent::GarbageCollect {
                now: current_timestamp_ms(),
                cache_period: config.cache_period_ms,
            };
            if !events.send(event) {
                debug!("Garbage collection task stopped: pipeline closed");
                break;
            }
        }
    })
}
