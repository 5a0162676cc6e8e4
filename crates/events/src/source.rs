//! Event source boundary traits.

use crate::error::{EventResult, PipelineError};
use async_trait::async_trait;

/// Processes one delivered payload. Failures are per-message: the consumer
/// logs them and moves on to the next delivery.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, payload: &[u8]) -> Result<(), PipelineError>;
}

/// Subscribe-by-queue-name transport boundary.
///
/// `consume` attaches to the queue and runs the delivery loop until the
/// source disconnects or fails; returning (Ok or Err) hands control back
/// to the supervision loop, which waits a fixed backoff and reattaches.
#[async_trait]
pub trait EventSource: Send + Sync {
    async fn consume(&self, queue: &str, handler: &dyn EventHandler) -> EventResult<()>;
}
