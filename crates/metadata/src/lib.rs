//! Metadata store abstraction, consistency cache, and lifecycle repository
//! for Docket.
//!
//! This crate provides the control-plane data layer:
//! - The `FileStore` adapter executing parameterized reads/writes against
//!   the record table, encrypting the name field at rest
//! - The read-through `FileCache` with coarse invalidation
//! - The `FileRepository` composing the two, the only component permitted
//!   to touch the store directly

pub mod cache;
pub mod crypto;
pub mod error;
pub mod models;
pub mod page;
pub mod repo;
pub mod sqlite;
pub mod store;

pub use cache::FileCache;
pub use crypto::NameKey;
pub use error::{MetadataError, MetadataResult};
pub use page::PageCursor;
pub use repo::FileRepository;
pub use sqlite::SqliteStore;
pub use store::FileStore;

use docket_core::config::MetadataConfig;
use std::sync::Arc;

/// Create a file store from configuration.
pub async fn from_config(config: &MetadataConfig) -> MetadataResult<Arc<dyn FileStore>> {
    let store = SqliteStore::new(&config.path).await?;
    Ok(Arc::new(store) as Arc<dyn FileStore>)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docket_core::config::MetadataConfig;

    #[tokio::test]
    async fn test_from_config_creates_database() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("metadata.db");
        let config = MetadataConfig {
            path: db_path.clone(),
            op_timeout_secs: 30,
        };

        let store = from_config(&config).await.unwrap();
        store.health_check().await.unwrap();
        assert!(db_path.exists());
    }
}
