//! SQLite-based file store implementation.

use crate::crypto::NameKey;
use crate::error::MetadataResult;
use crate::models::FileRow;
use crate::page::PageCursor;
use crate::store::FileStore;
use async_trait::async_trait;
use docket_core::{FileRecord, FileStatus, PAGE_SIZE};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

/// Embedded schema.
const SCHEMA: &str = include_str!("schema.sql");

/// SQLite-backed file store.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and run migrations.
    pub async fn new(path: impl AsRef<Path>) -> MetadataResult<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", path.display()))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            // Prevent transient "database is locked" errors under concurrent access.
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            // The request path, both consumers, and the sweep share this pool;
            // a single writer connection keeps SQLite happy under that load.
            .max_connections(1)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    fn open_rows(key: &NameKey, rows: Vec<FileRow>) -> MetadataResult<Vec<FileRecord>> {
        rows.into_iter().map(|row| row.open(key)).collect()
    }
}

#[async_trait]
impl FileStore for SqliteStore {
    async fn insert(&self, key: &NameKey, record: &FileRecord) -> MetadataResult<()> {
        let row = FileRow::seal(key, record)?;
        sqlx::query(
            "INSERT INTO files (id, ref_id, name_enc, extension, size, status, created_on)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&row.id)
        .bind(&row.ref_id)
        .bind(&row.name_enc)
        .bind(&row.extension)
        .bind(row.size)
        .bind(&row.status)
        .bind(row.created_on)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_by_id(&self, key: &NameKey, id: Uuid) -> MetadataResult<Option<FileRecord>> {
        let row: Option<FileRow> = sqlx::query_as(
            "SELECT id, ref_id, name_enc, extension, size, status, created_on
             FROM files WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;
        row.map(|row| row.open(key)).transpose()
    }

    async fn list_page(
        &self,
        key: &NameKey,
        cursor: Option<PageCursor>,
    ) -> MetadataResult<Vec<FileRecord>> {
        let rows: Vec<FileRow> = match cursor {
            Some(cursor) => {
                sqlx::query_as(
                    "SELECT id, ref_id, name_enc, extension, size, status, created_on
                     FROM files
                     WHERE created_on < ? OR (created_on = ? AND id < ?)
                     ORDER BY created_on DESC, id DESC
                     LIMIT ?",
                )
                .bind(cursor.created_nanos)
                .bind(cursor.created_nanos)
                .bind(cursor.id.to_string())
                .bind(PAGE_SIZE)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(
                    "SELECT id, ref_id, name_enc, extension, size, status, created_on
                     FROM files
                     ORDER BY created_on DESC, id DESC
                     LIMIT ?",
                )
                .bind(PAGE_SIZE)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Self::open_rows(key, rows)
    }

    async fn list_by_status(
        &self,
        key: &NameKey,
        status: FileStatus,
    ) -> MetadataResult<Vec<FileRecord>> {
        let rows: Vec<FileRow> = sqlx::query_as(
            "SELECT id, ref_id, name_enc, extension, size, status, created_on
             FROM files WHERE status = ?",
        )
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;
        Self::open_rows(key, rows)
    }

    async fn update(
        &self,
        id: Uuid,
        ref_id: Option<&str>,
        status: FileStatus,
    ) -> MetadataResult<bool> {
        let result = sqlx::query("UPDATE files SET ref_id = ?, status = ? WHERE id = ?")
            .bind(ref_id)
            .bind(status.as_str())
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> MetadataResult<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn migrate(&self) -> MetadataResult<()> {
        for statement in SCHEMA.split(';') {
            let trimmed = statement.trim();
            let has_sql = trimmed.lines().any(|line| {
                let line = line.trim();
                !line.is_empty() && !line.starts_with("--")
            });
            if has_sql {
                sqlx::query(trimmed).execute(&self.pool).await?;
            }
        }
        Ok(())
    }

    async fn health_check(&self) -> MetadataResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
