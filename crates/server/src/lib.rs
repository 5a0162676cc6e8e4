//! HTTP API server for Docket.
//!
//! This crate provides the request path:
//! - Upload intake (multipart, bounded size, staged-then-created)
//! - Record reads (point and paged, served cache-first)
//! - Health check
//! - The `docketd` binary wiring config, store, cache, and pipeline

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
