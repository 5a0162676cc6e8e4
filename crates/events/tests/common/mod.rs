//! Common pipeline test fixtures.

use docket_core::FileRecord;
use docket_metadata::{FileCache, FileRepository, NameKey, SqliteStore};
use docket_staging::StagingArea;
use docket_events::Reconciler;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use time::OffsetDateTime;

pub const TEST_SECRET: &str = "test-secret";

/// Everything a pipeline test needs, backed by temp storage.
#[allow(dead_code)]
pub struct TestPipeline {
    pub reconciler: Arc<Reconciler>,
    pub repo: Arc<FileRepository>,
    pub store: Arc<SqliteStore>,
    pub staging: Arc<StagingArea>,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestPipeline {
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");

        let store = Arc::new(
            SqliteStore::new(temp_dir.path().join("metadata.db"))
                .await
                .expect("Failed to open store"),
        );
        let staging = Arc::new(
            StagingArea::new(temp_dir.path().join("upload"))
                .await
                .expect("Failed to create staging area"),
        );
        let cache = Arc::new(FileCache::new());
        let repo = Arc::new(FileRepository::new(
            store.clone(),
            cache,
            Duration::from_secs(5),
        ));
        let reconciler = Arc::new(Reconciler::new(
            repo.clone(),
            staging.clone(),
            TEST_SECRET.to_string(),
        ));

        Self {
            reconciler,
            repo,
            store,
            staging,
            _temp_dir: temp_dir,
        }
    }

    pub fn key(&self) -> NameKey {
        NameKey::derive(TEST_SECRET)
    }

    /// Stage a file and create its record, exactly as intake does.
    pub async fn create_staged(&self) -> FileRecord {
        let name = self
            .staging
            .stage(bytes::Bytes::from_static(b"payload"), ".png")
            .await
            .expect("Failed to stage");
        let record = FileRecord::staged(name, ".png".to_string(), 7);
        self.repo
            .create(&self.key(), &record)
            .await
            .expect("Failed to create record");
        record
    }

    /// Create a record backdated by `age_hours`, staged file included.
    pub async fn create_aged(&self, age_hours: i64) -> FileRecord {
        let name = self
            .staging
            .stage(bytes::Bytes::from_static(b"payload"), ".png")
            .await
            .expect("Failed to stage");
        let mut record = FileRecord::staged(name, ".png".to_string(), 7);
        record.created_on = OffsetDateTime::now_utc() - time::Duration::hours(age_hours);
        self.repo
            .create(&self.key(), &record)
            .await
            .expect("Failed to create record");
        record
    }
}
