//! Server test utilities.

use axum::body::Body;
use axum::http::{Request, header};
use docket_core::config::{
    AppConfig, EncryptionConfig, EventsConfig, MetadataConfig, RetentionConfig, ServerConfig,
    StagingConfig,
};
use docket_metadata::{FileCache, FileRepository, FileStore, SqliteStore};
use docket_server::{AppState, create_router};
use docket_staging::StagingArea;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

pub const TEST_SECRET: &str = "test-secret";

/// A test server wrapper with all dependencies.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub state: AppState,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestServer {
    /// Create a new test server with temporary storage.
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");

        let staging_path = temp_dir.path().join("upload");
        let staging = Arc::new(
            StagingArea::new(&staging_path)
                .await
                .expect("Failed to create staging area"),
        );

        let db_path = temp_dir.path().join("metadata.db");
        let store: Arc<dyn FileStore> = Arc::new(
            SqliteStore::new(&db_path)
                .await
                .expect("Failed to create metadata store"),
        );

        let cache = Arc::new(FileCache::new());
        let repo = Arc::new(FileRepository::new(
            store.clone(),
            cache,
            Duration::from_secs(5),
        ));

        let config = AppConfig {
            server: ServerConfig::default(),
            metadata: MetadataConfig {
                path: db_path,
                op_timeout_secs: 5,
            },
            staging: StagingConfig {
                path: staging_path,
            },
            events: EventsConfig {
                url: "amqp://localhost:5672/%2f".to_string(),
                approved_queue: "approved-events".to_string(),
                delete_queue: "delete-events".to_string(),
                reconnect_backoff_secs: 10,
            },
            retention: RetentionConfig::default(),
            encryption: EncryptionConfig {
                secret: TEST_SECRET.to_string(),
            },
        };

        let state = AppState::new(config, repo, staging, store);
        let router = create_router(state.clone());

        Self {
            router,
            state,
            _temp_dir: temp_dir,
        }
    }
}

/// Multipart boundary used by test uploads.
pub const BOUNDARY: &str = "docket-test-boundary";

/// Build a multipart upload request for the given field/filename/bytes.
#[allow(dead_code)]
pub fn multipart_upload(field: &str, file_name: &str, data: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/document/file")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("Failed to build request")
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    serde_json::from_slice(&bytes).expect("Body is not JSON")
}
