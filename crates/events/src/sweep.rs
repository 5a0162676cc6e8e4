//! Periodic retention sweep task.

use crate::reconciler::Reconciler;
use docket_core::config::RetentionConfig;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Spawn the retention sweep on its fixed cadence. The first tick fires
/// one interval after startup. A failed fetch skips that run entirely
/// rather than partially processing with stale data.
pub fn spawn_sweeper(
    reconciler: Arc<Reconciler>,
    config: RetentionConfig,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let max_age = config.max_age();
        let mut ticker = tokio::time::interval(config.sweep_interval());
        // Consume the immediate first tick.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = shutdown.changed() => break,
            }

            tracing::info!("Retention sweep started");
            match reconciler.run_retention_sweep(max_age).await {
                Ok(stats) => tracing::info!(
                    examined = stats.examined,
                    purged = stats.purged,
                    failed = stats.failed,
                    "Retention sweep finished"
                ),
                Err(e) => tracing::error!(error = %e, "Retention sweep skipped: fetch failed"),
            }
        }
        tracing::info!("Retention sweep stopped");
    })
}
