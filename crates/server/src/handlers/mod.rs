//! HTTP request handlers.

pub mod files;
pub mod health;

pub use files::{get_files, upload};
pub use health::health_check;
