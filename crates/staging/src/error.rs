//! Staging error types.

use thiserror::Error;

/// Filesystem staging errors.
#[derive(Debug, Error)]
pub enum StagingError {
    #[error("staged file not found: {0}")]
    NotFound(String),

    #[error("invalid file name: {0}")]
    InvalidName(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for staging operations.
pub type StagingResult<T> = std::result::Result<T, StagingError>;
