//! Staging area rooted at a configured directory.

use crate::error::{StagingError, StagingResult};
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Subdirectory holding not-yet-approved files.
const TEMP_DIR: &str = "temp";

/// Staging area with a temp landing zone and a permanent directory.
pub struct StagingArea {
    root: PathBuf,
}

impl StagingArea {
    /// Create the staging area, ensuring both directories exist.
    pub async fn new(root: impl AsRef<Path>) -> StagingResult<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join(TEMP_DIR)).await?;
        Ok(Self { root })
    }

    /// Write uploaded bytes to the temp zone under a generated name.
    /// Returns the file name the record should carry.
    pub async fn stage(&self, data: Bytes, extension: &str) -> StagingResult<String> {
        validate_extension(extension)?;
        let name = format!("doc-{}{}", Uuid::new_v4(), extension);
        let path = self.temp_path(&name)?;
        let mut file = fs::File::create(&path).await?;
        file.write_all(&data).await?;
        file.flush().await?;
        Ok(name)
    }

    /// Whether a staged (temp) file exists for this name.
    pub async fn is_staged(&self, name: &str) -> StagingResult<bool> {
        let path = self.temp_path(name)?;
        match fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Move a staged file into permanent storage. Atomic rename within the
    /// staging root.
    pub async fn promote(&self, name: &str) -> StagingResult<()> {
        let from = self.temp_path(name)?;
        let to = self.permanent_path(name)?;
        fs::rename(&from, &to).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StagingError::NotFound(name.to_string())
            } else {
                StagingError::Io(e)
            }
        })
    }

    /// Remove a staged file. Already-gone is a no-op, so discard can be
    /// replayed safely.
    pub async fn discard(&self, name: &str) -> StagingResult<()> {
        let path = self.temp_path(name)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Whether a promoted (permanent) file exists for this name.
    pub async fn is_promoted(&self, name: &str) -> StagingResult<bool> {
        let path = self.permanent_path(name)?;
        match fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn temp_path(&self, name: &str) -> StagingResult<PathBuf> {
        validate_name(name)?;
        Ok(self.root.join(TEMP_DIR).join(name))
    }

    fn permanent_path(&self, name: &str) -> StagingResult<PathBuf> {
        validate_name(name)?;
        Ok(self.root.join(name))
    }
}

/// Reject names that could escape the staging root.
fn validate_name(name: &str) -> StagingResult<()> {
    if name.is_empty() {
        return Err(StagingError::InvalidName("empty name".to_string()));
    }
    if name.contains("..") || name.contains('/') || name.contains('\\') {
        return Err(StagingError::InvalidName(format!(
            "path traversal not allowed: {name}"
        )));
    }
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(std::path::Component::Normal(_)), None) => Ok(()),
        _ => Err(StagingError::InvalidName(format!(
            "contains unsafe path component: {name}"
        ))),
    }
}

fn validate_extension(extension: &str) -> StagingResult<()> {
    if !extension.starts_with('.')
        || !extension[1..]
            .chars()
            .all(|c| c.is_ascii_alphanumeric())
        || extension.len() < 2
    {
        return Err(StagingError::InvalidName(format!(
            "invalid extension: {extension}"
        )));
    }
    Ok(())
}
