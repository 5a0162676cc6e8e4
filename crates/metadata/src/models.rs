//! Database models mapping to the record table.

use crate::crypto::NameKey;
use crate::error::{MetadataError, MetadataResult};
use docket_core::{FileRecord, FileStatus};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Raw row shape for the `files` table. The name column holds the sealed
/// ciphertext; `created_on` is unix nanoseconds UTC so that keyset
/// comparisons stay plain integer comparisons.
#[derive(Debug, Clone, FromRow)]
pub struct FileRow {
    pub id: String,
    pub ref_id: Option<String>,
    pub name_enc: Vec<u8>,
    pub extension: String,
    pub size: i64,
    pub status: String,
    pub created_on: i64,
}

impl FileRow {
    /// Seal a domain record into its row shape.
    pub fn seal(key: &NameKey, record: &FileRecord) -> MetadataResult<Self> {
        Ok(Self {
            id: record.id.to_string(),
            ref_id: record.ref_id.clone(),
            name_enc: key.seal(&record.name)?,
            extension: record.extension.clone(),
            size: record.size,
            status: record.status.as_str().to_string(),
            created_on: timestamp_to_nanos(record.created_on)?,
        })
    }

    /// Decrypt and convert back into the domain record.
    pub fn open(self, key: &NameKey) -> MetadataResult<FileRecord> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| MetadataError::InvalidRecord(format!("bad id {}: {e}", self.id)))?;
        let status: FileStatus = self
            .status
            .parse()
            .map_err(|_| MetadataError::InvalidRecord(format!("bad status {}", self.status)))?;
        let created_on = OffsetDateTime::from_unix_timestamp_nanos(self.created_on as i128)
            .map_err(|e| MetadataError::InvalidRecord(format!("bad created_on: {e}")))?;
        Ok(FileRecord {
            id,
            ref_id: self.ref_id,
            name: key.open(&self.name_enc)?,
            extension: self.extension,
            size: self.size,
            status,
            created_on,
        })
    }
}

/// Convert a timestamp to the stored unix-nanosecond representation.
pub fn timestamp_to_nanos(ts: OffsetDateTime) -> MetadataResult<i64> {
    i64::try_from(ts.unix_timestamp_nanos())
        .map_err(|_| MetadataError::InvalidRecord(format!("timestamp out of range: {ts}")))
}
