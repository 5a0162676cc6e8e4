//! Status-transition authority.
//!
//! All legality checks for the `new -> approved` / `new -> removed` state
//! machine live here, in exactly one place. The repository underneath
//! stores whatever it is given.

use crate::error::PipelineError;
use docket_core::{ApprovalPayload, DeletionPayload, FileStatus, FileSummary};
use docket_metadata::{FileRepository, NameKey};
use docket_staging::StagingArea;
use std::sync::Arc;
use std::time::Duration;
use time::OffsetDateTime;
use uuid::Uuid;

/// Outcome of one retention sweep run.
#[derive(Debug, Default, Clone, Copy)]
pub struct SweepStats {
    pub examined: usize,
    pub purged: usize,
    pub failed: usize,
}

pub struct Reconciler {
    repo: Arc<FileRepository>,
    staging: Arc<StagingArea>,
    secret: String,
}

impl Reconciler {
    pub fn new(repo: Arc<FileRepository>, staging: Arc<StagingArea>, secret: String) -> Self {
        Self {
            repo,
            staging,
            secret,
        }
    }

    /// Handle an `approved-events` payload: `{id, refId}`.
    pub async fn approve(&self, payload: &[u8]) -> Result<FileSummary, PipelineError> {
        let payload: ApprovalPayload = serde_json::from_slice(payload)?;
        let (id, ref_id) = payload.validate()?;
        self.apply_approval(id, ref_id).await
    }

    /// Transition a record to `approved` and promote its staged file.
    pub async fn apply_approval(
        &self,
        id: Uuid,
        ref_id: &str,
    ) -> Result<FileSummary, PipelineError> {
        let key = self.key();
        let mut record = self.repo.get_by_id(&key, id).await?;

        record.status = FileStatus::Approved;
        record.ref_id = Some(ref_id.to_string());
        self.repo.update(&record).await?;

        // The status change is already durable. A failed move leaves the
        // file in the temp zone; accepted inconsistency window, see DESIGN.md.
        if let Err(e) = self.staging.promote(&record.name).await {
            tracing::warn!(
                id = %id,
                error = %e,
                "Staged file promotion failed after approval"
            );
        }

        tracing::info!(id = %id, "File approved");
        Ok(FileSummary::from(&record))
    }

    /// Handle a `delete-events` payload: `{id}`.
    pub async fn delete(&self, payload: &[u8]) -> Result<(), PipelineError> {
        let payload: DeletionPayload = serde_json::from_slice(payload)?;
        let id = payload.validate()?;
        self.apply_deletion(id).await
    }

    /// Remove a record and its staged file. Approved records are immutable
    /// against deletion.
    pub async fn apply_deletion(&self, id: Uuid) -> Result<(), PipelineError> {
        let key = self.key();
        let record = self.repo.get_by_id(&key, id).await?;

        if record.status == FileStatus::Approved {
            return Err(PipelineError::Policy(format!(
                "file {id} is approved and cannot be deleted"
            )));
        }

        self.repo.delete(record.id).await?;

        if let Err(e) = self.staging.discard(&record.name).await {
            tracing::warn!(id = %id, error = %e, "Staged file discard failed after delete");
        }

        tracing::info!(id = %id, "File deleted");
        Ok(())
    }

    /// Purge `new` records older than `max_age`. Works off a fresh store
    /// snapshot, never the cache.
    ///
    /// The fetch failing fails the whole run (the caller logs and skips);
    /// a single record failing only skips that record.
    pub async fn run_retention_sweep(&self, max_age: Duration) -> Result<SweepStats, PipelineError> {
        let key = self.key();
        let candidates = self.repo.get_by_status(&key, FileStatus::New).await?;

        let now = OffsetDateTime::now_utc();
        let mut stats = SweepStats {
            examined: candidates.len(),
            ..Default::default()
        };

        for record in candidates {
            let age = now - record.created_on;
            if age < max_age {
                continue;
            }
            match self.apply_deletion(record.id).await {
                Ok(()) => stats.purged += 1,
                // Raced with a delete event; the record is gone either way.
                Err(PipelineError::Metadata(docket_metadata::MetadataError::NotFound(_))) => {}
                Err(e) => {
                    stats.failed += 1;
                    tracing::error!(id = %record.id, error = %e, "Retention sweep delete failed");
                }
            }
        }

        Ok(stats)
    }

    fn key(&self) -> NameKey {
        NameKey::derive(&self.secret)
    }
}
