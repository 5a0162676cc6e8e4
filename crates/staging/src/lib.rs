//! Filesystem staging area for Docket.
//!
//! Uploaded bytes land in a temporary directory first. Approval promotes
//! the file into permanent storage with an atomic rename; deletion and
//! failed creates discard the staged copy.

pub mod area;
pub mod error;

pub use area::StagingArea;
pub use error::{StagingError, StagingResult};
