//! Consumer supervision loops.

use crate::error::PipelineError;
use crate::reconciler::Reconciler;
use crate::source::{EventHandler, EventSource};
use async_trait::async_trait;
use docket_core::config::EventsConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Handler feeding `approved-events` payloads to the reconciler.
pub struct ApproveHandler(pub Arc<Reconciler>);

#[async_trait]
impl EventHandler for ApproveHandler {
    async fn handle(&self, payload: &[u8]) -> Result<(), PipelineError> {
        self.0.approve(payload).await.map(|_| ())
    }
}

/// Handler feeding `delete-events` payloads to the reconciler.
pub struct DeleteHandler(pub Arc<Reconciler>);

#[async_trait]
impl EventHandler for DeleteHandler {
    async fn handle(&self, payload: &[u8]) -> Result<(), PipelineError> {
        self.0.delete(payload).await
    }
}

/// Attach to a queue and keep it attached: consume until disconnect, wait
/// the fixed backoff, reattach. No backoff growth, no retry cap; the loop
/// ends only on shutdown.
pub async fn run_consumer(
    source: Arc<dyn EventSource>,
    queue: String,
    handler: Arc<dyn EventHandler>,
    backoff: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            result = source.consume(&queue, handler.as_ref()) => {
                match result {
                    Ok(()) => tracing::info!(queue = %queue, "Consumer detached"),
                    Err(e) => tracing::warn!(queue = %queue, error = %e, "Consumer failed"),
                }
            }
            _ = shutdown.changed() => break,
        }

        // Backoff sleep is interruptible on shutdown.
        tokio::select! {
            _ = tokio::time::sleep(backoff) => {}
            _ = shutdown.changed() => break,
        }
    }
    tracing::info!(queue = %queue, "Consumer stopped");
}

/// Spawn the two independent consumer loops.
pub fn spawn_consumers(
    source: Arc<dyn EventSource>,
    reconciler: Arc<Reconciler>,
    config: &EventsConfig,
    shutdown: watch::Receiver<bool>,
) -> Vec<JoinHandle<()>> {
    let backoff = config.reconnect_backoff();
    vec![
        tokio::spawn(run_consumer(
            source.clone(),
            config.approved_queue.clone(),
            Arc::new(ApproveHandler(reconciler.clone())),
            backoff,
            shutdown.clone(),
        )),
        tokio::spawn(run_consumer(
            source,
            config.delete_queue.clone(),
            Arc::new(DeleteHandler(reconciler)),
            backoff,
            shutdown,
        )),
    ]
}
