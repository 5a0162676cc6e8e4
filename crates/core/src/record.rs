//! File record model and status workflow.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;
use uuid::Uuid;

/// Lifecycle status of a file record.
///
/// A record is created as `New` and either transitions to `Approved`
/// (terminal) or is removed outright. There is no path out of `Approved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    New,
    Approved,
}

impl FileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Approved => "approved",
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "new" => Ok(Self::New),
            "approved" => Ok(Self::Approved),
            other => Err(Error::InvalidStatus(other.to_string())),
        }
    }
}

/// Persisted metadata for one uploaded file.
///
/// The `name` field is plaintext in memory only; the store adapter encrypts
/// it at rest with a key supplied on every call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_id: Option<String>,
    pub name: String,
    pub extension: String,
    pub size: i64,
    pub status: FileStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_on: OffsetDateTime,
}

impl FileRecord {
    /// Build a fresh record for a staged upload. Assigns the id and the
    /// creation timestamp; status starts at `New`.
    pub fn staged(name: String, extension: String, size: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            ref_id: None,
            name,
            extension,
            size,
            status: FileStatus::New,
            created_on: OffsetDateTime::now_utc(),
        }
    }

    /// Required-field checks for a create payload.
    pub fn validate_create(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::Validation("name is required".to_string()));
        }
        if self.extension.is_empty() {
            return Err(Error::Validation("extension is required".to_string()));
        }
        if self.size <= 0 {
            return Err(Error::Validation("size is required".to_string()));
        }
        Ok(())
    }
}

/// Trimmed record shape returned to callers after a mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileSummary {
    pub id: Uuid,
    pub status: FileStatus,
    pub name: String,
}

impl From<&FileRecord> for FileSummary {
    fn from(record: &FileRecord) -> Self {
        Self {
            id: record.id,
            status: record.status,
            name: record.name.clone(),
        }
    }
}

/// Inbound payload on the `approved-events` queue.
#[derive(Debug, Clone, Deserialize)]
pub struct ApprovalPayload {
    pub id: Option<Uuid>,
    #[serde(rename = "refId")]
    pub ref_id: Option<String>,
}

impl ApprovalPayload {
    /// Required-field checks; returns the validated pair.
    pub fn validate(&self) -> Result<(Uuid, &str)> {
        let id = self
            .id
            .ok_or_else(|| Error::Validation("id is required".to_string()))?;
        let ref_id = self
            .ref_id
            .as_deref()
            .filter(|r| !r.is_empty())
            .ok_or_else(|| Error::Validation("refId is required".to_string()))?;
        Ok((id, ref_id))
    }
}

/// Inbound payload on the `delete-events` queue.
#[derive(Debug, Clone, Deserialize)]
pub struct DeletionPayload {
    pub id: Option<Uuid>,
}

impl DeletionPayload {
    pub fn validate(&self) -> Result<Uuid> {
        self.id
            .ok_or_else(|| Error::Validation("id is required".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> FileRecord {
        FileRecord::staged("doc-1.png".to_string(), ".png".to_string(), 1024)
    }

    #[test]
    fn test_staged_record_defaults() {
        let r = record();
        assert_eq!(r.status, FileStatus::New);
        assert!(r.ref_id.is_none());
        assert!(r.validate_create().is_ok());
    }

    #[test]
    fn test_validate_create_rejects_missing_fields() {
        let mut r = record();
        r.name.clear();
        assert!(matches!(r.validate_create(), Err(Error::Validation(_))));

        let mut r = record();
        r.size = 0;
        assert!(matches!(r.validate_create(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_status_round_trip() {
        assert_eq!("approved".parse::<FileStatus>().unwrap(), FileStatus::Approved);
        assert_eq!(FileStatus::New.as_str(), "new");
        assert!("temp".parse::<FileStatus>().is_err());
    }

    #[test]
    fn test_approval_payload_validation() {
        let payload: ApprovalPayload =
            serde_json::from_str(r#"{"id":"c45d75d7-276f-4f53-bffb-2b1b5a7119e9","refId":"ext-123"}"#)
                .unwrap();
        let (_, ref_id) = payload.validate().unwrap();
        assert_eq!(ref_id, "ext-123");

        let missing: ApprovalPayload = serde_json::from_str(r#"{"refId":"ext-123"}"#).unwrap();
        assert!(missing.validate().is_err());

        let empty: ApprovalPayload =
            serde_json::from_str(r#"{"id":"c45d75d7-276f-4f53-bffb-2b1b5a7119e9","refId":""}"#)
                .unwrap();
        assert!(empty.validate().is_err());
    }
}
