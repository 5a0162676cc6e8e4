//! Record read and upload intake handlers.

use crate::error::{ApiError, ApiResult, ok};
use crate::state::AppState;
use axum::extract::{Multipart, Query, State};
use axum::response::{IntoResponse, Response};
use docket_core::{FileRecord, FileSummary, MAX_UPLOAD_BYTES};
use docket_metadata::PageCursor;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Multipart field carrying the uploaded bytes.
const UPLOAD_FIELD: &str = "image";

/// Extension applied when the client filename carries none.
const DEFAULT_EXTENSION: &str = ".png";

#[derive(Debug, Deserialize)]
pub struct FileQuery {
    /// Point lookup.
    pub id: Option<Uuid>,
    /// Opaque cursor resuming a newest-first listing.
    #[serde(rename = "lastId")]
    pub last_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilePage {
    pub files: Vec<FileRecord>,
    /// Cursor for the next page; absent on the last page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// `GET /document/file` — single record when `id` is given, otherwise one
/// page of records resuming after `lastId`.
pub async fn get_files(
    State(state): State<AppState>,
    Query(query): Query<FileQuery>,
) -> ApiResult<Response> {
    let key = state.name_key();

    if let Some(id) = query.id {
        let record = state.repo.get_by_id(&key, id).await?;
        return Ok(ok(record).into_response());
    }

    let cursor = query
        .last_id
        .as_deref()
        .map(PageCursor::from_token)
        .transpose()?;
    let files = state.repo.get_page(&key, cursor).await?;

    let next_cursor = if files.len() == docket_core::PAGE_SIZE as usize {
        let last = &files[files.len() - 1];
        Some(PageCursor::after(last.created_on, last.id)?.to_token())
    } else {
        None
    };

    Ok(ok(FilePage { files, next_cursor }).into_response())
}

/// `POST /document/file` — multipart upload intake.
///
/// Stages the bytes first, then creates the record; a failed create
/// discards the staged file so nothing is orphaned.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Response> {
    let mut upload: Option<(bytes::Bytes, String)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart request: {e}")))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let extension = derive_extension(field.file_name());
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("failed to read upload: {e}")))?;
        upload = Some((data, extension));
        break;
    }

    let (data, extension) =
        upload.ok_or_else(|| ApiError::BadRequest(format!("missing field {UPLOAD_FIELD:?}")))?;

    if data.is_empty() {
        return Err(ApiError::BadRequest("uploaded file is empty".to_string()));
    }
    if data.len() > MAX_UPLOAD_BYTES {
        return Err(ApiError::PayloadTooLarge(MAX_UPLOAD_BYTES));
    }

    let size = data.len() as i64;
    let name = state.staging.stage(data, &extension).await?;

    let record = FileRecord::staged(name, extension, size);
    if let Err(e) = record.validate_create() {
        state.staging.discard(&record.name).await?;
        return Err(e.into());
    }

    let key = state.name_key();
    if let Err(e) = state.repo.create(&key, &record).await {
        // No orphaned temp files: creation failed, so the staged copy goes.
        if let Err(cleanup) = state.staging.discard(&record.name).await {
            tracing::error!(name = %record.name, error = %cleanup, "Staged file cleanup failed");
        }
        return Err(e.into());
    }

    tracing::info!(id = %record.id, size = size, "File uploaded");
    Ok(ok(FileSummary::from(&record)).into_response())
}

/// Derive a safe storage extension from the client-supplied filename.
fn derive_extension(file_name: Option<&str>) -> String {
    let ext = file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()));
    match ext {
        Some(ext) => format!(".{}", ext.to_ascii_lowercase()),
        None => DEFAULT_EXTENSION.to_string(),
    }
}
