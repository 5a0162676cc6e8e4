//! Route configuration.

use crate::handlers;
use crate::state::AppState;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use docket_core::MAX_UPLOAD_BYTES;
use tower_http::trace::TraceLayer;

/// Slack on top of the upload cap for multipart framing overhead.
const BODY_LIMIT_SLACK: usize = 16 * 1024;

/// Create the application router.
///
/// Methods other than GET/POST on /document/file get axum's 405 with the
/// `Allow: GET, POST` header.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/document/file",
            get(handlers::get_files).post(handlers::upload),
        )
        .route("/health", get(handlers::health_check))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + BODY_LIMIT_SLACK))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
