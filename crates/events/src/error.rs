//! Pipeline and event source error types.

use thiserror::Error;

/// Event source transport errors. Any of these tears down the current
/// consumer attachment; the supervision loop backs off and reattaches.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("event source connect failed: {0}")]
    Connect(String),

    #[error("event source consume failed: {0}")]
    Consume(String),

    #[error("event source disconnected: {0}")]
    Disconnected(String),
}

/// Result type for event source operations.
pub type EventResult<T> = std::result::Result<T, EventError>;

/// Per-message reconciliation errors. All of these are terminal for the
/// triggering message only: logged and dropped, never requeued.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("malformed payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error(transparent)]
    Validation(#[from] docket_core::Error),

    #[error("policy violation: {0}")]
    Policy(String),

    #[error(transparent)]
    Metadata(#[from] docket_metadata::MetadataError),

    #[error(transparent)]
    Staging(#[from] docket_staging::StagingError),
}

impl PipelineError {
    /// Whether this is a client-side problem with the message itself
    /// (malformed, illegal, or pointing at nothing), as opposed to a
    /// backing-service failure.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::Payload(_)
                | Self::Validation(_)
                | Self::Policy(_)
                | Self::Metadata(docket_metadata::MetadataError::NotFound(_))
        )
    }
}
