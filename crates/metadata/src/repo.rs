//! Lifecycle repository composing the store and the cache.
//!
//! The only component permitted to read the store directly. Reads consult
//! the cache first and repopulate it on miss; every successful mutation
//! invalidates all tracked cache keys before returning.

use crate::cache::FileCache;
use crate::crypto::NameKey;
use crate::error::{MetadataError, MetadataResult};
use crate::page::PageCursor;
use crate::store::FileStore;
use docket_core::{FileRecord, FileStatus};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub struct FileRepository {
    store: Arc<dyn FileStore>,
    cache: Arc<FileCache>,
    op_timeout: Duration,
}

impl FileRepository {
    pub fn new(store: Arc<dyn FileStore>, cache: Arc<FileCache>, op_timeout: Duration) -> Self {
        Self {
            store,
            cache,
            op_timeout,
        }
    }

    /// Insert a record, then invalidate the cache.
    pub async fn create(&self, key: &NameKey, record: &FileRecord) -> MetadataResult<()> {
        self.with_deadline(self.store.insert(key, record)).await?;
        self.cache.invalidate_all();
        Ok(())
    }

    /// Point read, cache-first. `NotFound` when no record exists.
    pub async fn get_by_id(&self, key: &NameKey, id: Uuid) -> MetadataResult<FileRecord> {
        let cache_key = Self::record_key(id);
        if let Some(record) = self.cache.get_record(&cache_key) {
            return Ok(record);
        }

        let record = self
            .with_deadline(self.store.get_by_id(key, id))
            .await?
            .ok_or_else(|| MetadataError::NotFound(format!("file {id}")))?;
        self.cache.put_record(&cache_key, &record);
        Ok(record)
    }

    /// List read, cache-first, newest-first keyset page.
    pub async fn get_page(
        &self,
        key: &NameKey,
        cursor: Option<PageCursor>,
    ) -> MetadataResult<Vec<FileRecord>> {
        let cache_key = Self::page_key(cursor);
        if let Some(page) = self.cache.get_page(&cache_key) {
            return Ok(page);
        }

        let page = self.with_deadline(self.store.list_page(key, cursor)).await?;
        self.cache.put_page(&cache_key, &page);
        Ok(page)
    }

    /// Status snapshot, bypassing the cache. The retention sweep depends on
    /// this being fresh every run.
    pub async fn get_by_status(
        &self,
        key: &NameKey,
        status: FileStatus,
    ) -> MetadataResult<Vec<FileRecord>> {
        self.with_deadline(self.store.list_by_status(key, status))
            .await
    }

    /// Unconditional `ref_id`/`status` overwrite, then cache invalidation.
    /// Pure storage: transition legality is the pipeline's responsibility.
    pub async fn update(&self, record: &FileRecord) -> MetadataResult<()> {
        let touched = self
            .with_deadline(
                self.store
                    .update(record.id, record.ref_id.as_deref(), record.status),
            )
            .await?;
        if !touched {
            return Err(MetadataError::NotFound(format!("file {}", record.id)));
        }
        self.cache.invalidate_all();
        Ok(())
    }

    /// Unconditional row removal, then cache invalidation. Callers enforce
    /// that approved records are not deletable.
    pub async fn delete(&self, id: Uuid) -> MetadataResult<()> {
        let removed = self.with_deadline(self.store.delete(id)).await?;
        if !removed {
            return Err(MetadataError::NotFound(format!("file {id}")));
        }
        self.cache.invalidate_all();
        Ok(())
    }

    /// Apply the per-operation deadline. Elapsing aborts the store call and
    /// surfaces as a timeout instead of blocking indefinitely.
    async fn with_deadline<T, F>(&self, fut: F) -> MetadataResult<T>
    where
        F: Future<Output = MetadataResult<T>>,
    {
        tokio::time::timeout(self.op_timeout, fut)
            .await
            .map_err(|_| MetadataError::Timeout(self.op_timeout))?
    }

    fn record_key(id: Uuid) -> String {
        format!("file:{id}")
    }

    fn page_key(cursor: Option<PageCursor>) -> String {
        match cursor {
            Some(cursor) => format!("files:{}", cursor.to_token()),
            None => "files:first".to_string(),
        }
    }
}
