//! Health check handler.

use crate::error::{ApiResult, SuccessEnvelope, ok};
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Liveness probe. Verifies store connectivity so the process never
/// reports healthy while the database is unreachable.
pub async fn health_check(
    State(state): State<AppState>,
) -> ApiResult<Json<SuccessEnvelope<HealthResponse>>> {
    state.store.health_check().await?;
    Ok(ok(HealthResponse { status: "ok" }))
}
