//! Apply Pipeline
//!
//! Single consumer that applies cache events in the order they were sent.
//! Every writer (dispatcher, garbage collector, direct callers) goes through
//! an [`EventSender`], so the state is only ever mutated by one task.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::CacheState;
use crate::models::CacheEvent;

// == Messages ==
pub(crate) enum PipelineMessage {
    Apply(CacheEvent),
    /// Answered once every message queued before it has been applied
    Sync(oneshot::Sender<()>),
}

impl std::fmt::Debug for PipelineMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineMessage::Apply(event) => f.debug_tuple("Apply").field(event).finish(),
            PipelineMessage::Sync(_) => f.write_str("Sync"),
        }
    }
}

// == Event Sender ==
/// Cloneable handle for queueing events on the apply pipeline.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::UnboundedSender<PipelineMessage>,
}

impl EventSender {
    /// Creates a sender and the receiver to hand to [`spawn_apply_task`].
    pub fn channel() -> (Self, EventReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, EventReceiver { rx })
    }

    /// Queues an event.
    ///
    /// # Returns
    /// `false` if the pipeline has shut down and the event was dropped.
    pub fn send(&self, event: CacheEvent) -> bool {
        match self.tx.send(PipelineMessage::Apply(event)) {
            Ok(()) => true,
            Err(_) => {
                warn!("Apply pipeline closed, dropping event");
                false
            }
        }
    }

    /// Waits until every event sent before this call has been applied.
    ///
    /// Returns immediately if the pipeline has shut down.
    pub async fn sync(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(PipelineMessage::Sync(done_tx)).is_err() {
            return;
        }
        let _ = done_rx.await;
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Receiving end of an [`EventSender`] channel.
#[derive(Debug)]
pub struct EventReceiver {
    rx: mpsc::UnboundedReceiver<PipelineMessage>,
}

// == Apply Task ==
/// Spawns the task that drains `events` into `state`.
///
/// # Arguments
/// * `state` - shared cache state, written only by this task
/// * `events` - receiver paired with the senders feeding the pipeline
///
/// # Returns
/// A JoinHandle for the task. It exits once every sender is dropped.
pub fn spawn_apply_task(state: Arc<RwLock<CacheState>>, events: EventReceiver) -> JoinHandle<()> {
    let mut rx = events.rx;

    tokio::spawn(async move {
        info!("Starting cache apply pipeline");

        while let Some(message) = rx.recv().await {
            match message {
                PipelineMessage::Apply(event) => {
                    let mut guard = state.write().await;
                    guard.apply(&event);
                }
                PipelineMessage::Sync(done) => {
                    let _ = done.send(());
                }
            }
        }

        debug!("Apply pipeline stopped: all senders dropped");
    })
}
