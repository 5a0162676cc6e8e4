//! Mock stores for repository behavior tests.

use async_trait::async_trait;
use docket_core::{FileRecord, FileStatus};
use docket_metadata::{FileStore, MetadataResult, NameKey, PageCursor};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use uuid::Uuid;

/// Store wrapper that delays every operation and counts calls.
/// Used to exercise the repository deadline and cache hit paths.
pub struct SlowStore {
    inner: Arc<dyn FileStore>,
    delay: Duration,
    calls: AtomicUsize,
}

#[allow(dead_code)]
impl SlowStore {
    pub fn new(inner: Arc<dyn FileStore>, delay: Duration) -> Self {
        Self {
            inner,
            delay,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of operations that reached the store (cache misses).
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn stall(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
    }
}

#[async_trait]
impl FileStore for SlowStore {
    async fn insert(&self, key: &NameKey, record: &FileRecord) -> MetadataResult<()> {
        self.stall().await;
        self.inner.insert(key, record).await
    }

    async fn get_by_id(&self, key: &NameKey, id: Uuid) -> MetadataResult<Option<FileRecord>> {
        self.stall().await;
        self.inner.get_by_id(key, id).await
    }

    async fn list_page(
        &self,
        key: &NameKey,
        cursor: Option<PageCursor>,
    ) -> MetadataResult<Vec<FileRecord>> {
        self.stall().await;
        self.inner.list_page(key, cursor).await
    }

    async fn list_by_status(
        &self,
        key: &NameKey,
        status: FileStatus,
    ) -> MetadataResult<Vec<FileRecord>> {
        self.stall().await;
        self.inner.list_by_status(key, status).await
    }

    async fn update(
        &self,
        id: Uuid,
        ref_id: Option<&str>,
        status: FileStatus,
    ) -> MetadataResult<bool> {
        self.stall().await;
        self.inner.update(id, ref_id, status).await
    }

    async fn delete(&self, id: Uuid) -> MetadataResult<bool> {
        self.stall().await;
        self.inner.delete(id).await
    }

    async fn migrate(&self) -> MetadataResult<()> {
        self.inner.migrate().await
    }

    async fn health_check(&self) -> MetadataResult<()> {
        self.inner.health_check().await
    }
}
