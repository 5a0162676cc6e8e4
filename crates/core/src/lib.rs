//! Core domain types for Docket.
//!
//! This crate defines the file record model, its status workflow,
//! payload validation, configuration types, and the core error type
//! shared across the workspace.

pub mod config;
pub mod error;
pub mod record;

pub use error::{Error, Result};
pub use record::{ApprovalPayload, DeletionPayload, FileRecord, FileStatus, FileSummary};

/// Fixed page size for record listings.
pub const PAGE_SIZE: u32 = 20;

/// Maximum accepted upload size (10 MiB).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
