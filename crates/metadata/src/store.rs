//! File store trait.

use crate::crypto::NameKey;
use crate::error::MetadataResult;
use crate::page::PageCursor;
use async_trait::async_trait;
use docket_core::{FileRecord, FileStatus};
use uuid::Uuid;

/// Adapter over the persistent record table.
///
/// Operations touching the name field take the encryption key as a
/// parameter; the adapter never holds key material between calls.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Insert a new record.
    async fn insert(&self, key: &NameKey, record: &FileRecord) -> MetadataResult<()>;

    /// Fetch a single record by id. `None` when absent.
    async fn get_by_id(&self, key: &NameKey, id: Uuid) -> MetadataResult<Option<FileRecord>>;

    /// Fetch one page of records, newest-first, bounded by
    /// [`docket_core::PAGE_SIZE`]. `cursor` resumes after the last row of
    /// the previous page.
    async fn list_page(
        &self,
        key: &NameKey,
        cursor: Option<PageCursor>,
    ) -> MetadataResult<Vec<FileRecord>>;

    /// Fetch all records in the given status, unordered.
    async fn list_by_status(
        &self,
        key: &NameKey,
        status: FileStatus,
    ) -> MetadataResult<Vec<FileRecord>>;

    /// Overwrite `ref_id` and `status` for a record. Returns whether a row
    /// was touched. Pure storage: transition legality is enforced by the
    /// caller.
    async fn update(
        &self,
        id: Uuid,
        ref_id: Option<&str>,
        status: FileStatus,
    ) -> MetadataResult<bool>;

    /// Remove a record. Returns whether a row was removed; deleting an
    /// already-gone id is not an error at this layer.
    async fn delete(&self, id: Uuid) -> MetadataResult<bool>;

    /// Run schema migrations.
    async fn migrate(&self) -> MetadataResult<()>;

    /// Check database connectivity and health.
    async fn health_check(&self) -> MetadataResult<()>;
}
