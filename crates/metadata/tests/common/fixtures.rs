//! Shared fixtures for metadata tests.
//! Note: #[allow(dead_code)] because each test file compiles common/ separately.

use docket_core::FileRecord;
use docket_metadata::{NameKey, SqliteStore};
use tempfile::TempDir;
use time::{Duration, OffsetDateTime};

#[allow(dead_code)]
pub fn test_key() -> NameKey {
    NameKey::derive("test-secret")
}

/// Open a fresh store backed by a temporary database file.
#[allow(dead_code)]
pub async fn temp_store() -> (SqliteStore, TempDir) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let store = SqliteStore::new(temp_dir.path().join("metadata.db"))
        .await
        .expect("Failed to open store");
    (store, temp_dir)
}

#[allow(dead_code)]
pub fn sample_record(name: &str) -> FileRecord {
    FileRecord::staged(name.to_string(), ".png".to_string(), 1024)
}

/// A `new` record backdated by `age_hours`, for retention scenarios.
#[allow(dead_code)]
pub fn aged_record(name: &str, age_hours: i64) -> FileRecord {
    let mut record = sample_record(name);
    record.created_on = OffsetDateTime::now_utc() - Duration::hours(age_hours);
    record
}
