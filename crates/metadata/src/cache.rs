//! Read-through consistency cache.
//!
//! Accelerates repeated point- and list-reads in front of the store. The
//! invalidation policy is coarse: any successful mutation clears every
//! tracked key before the mutation call returns, so a stale read can only
//! happen during the invalidation step itself, never after a completed
//! mutation.

use dashmap::{DashMap, DashSet};
use docket_core::FileRecord;
use std::time::{Duration, Instant};

/// Point-lookup entry lifetime.
const RECORD_TTL: Duration = Duration::from_secs(5 * 60);

/// List-lookup entry lifetime.
const LIST_TTL: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, Clone)]
enum CachedValue {
    Record(FileRecord),
    Page(Vec<FileRecord>),
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: CachedValue,
    expires_at: Instant,
}

/// In-process cache with a registry of live keys for bulk invalidation.
///
/// Shared by the request path and every pipeline actor; both the entry map
/// and the registry are concurrency-safe collections, never free-standing
/// mutable state.
pub struct FileCache {
    entries: DashMap<String, CacheEntry>,
    registry: DashSet<String>,
    record_ttl: Duration,
    list_ttl: Duration,
}

impl FileCache {
    pub fn new() -> Self {
        Self::with_ttls(RECORD_TTL, LIST_TTL)
    }

    /// Construct with explicit entry lifetimes. Tests use short TTLs.
    pub fn with_ttls(record_ttl: Duration, list_ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            registry: DashSet::new(),
            record_ttl,
            list_ttl,
        }
    }

    /// Point lookup. Expired entries are dropped on the way out.
    pub fn get_record(&self, key: &str) -> Option<FileRecord> {
        match self.get_live(key)? {
            CachedValue::Record(record) => Some(record),
            CachedValue::Page(_) => None,
        }
    }

    /// List lookup.
    pub fn get_page(&self, key: &str) -> Option<Vec<FileRecord>> {
        match self.get_live(key)? {
            CachedValue::Page(page) => Some(page),
            CachedValue::Record(_) => None,
        }
    }

    /// Populate a point entry and register its key.
    pub fn put_record(&self, key: &str, record: &FileRecord) {
        self.put(key, CachedValue::Record(record.clone()), self.record_ttl);
    }

    /// Populate a list entry and register its key. Empty pages are never
    /// cached, so a miss sentinel cannot be mistaken for data.
    pub fn put_page(&self, key: &str, page: &[FileRecord]) {
        if page.is_empty() {
            return;
        }
        self.put(key, CachedValue::Page(page.to_vec()), self.list_ttl);
    }

    /// Coarse invalidation: clear every registered key, then reset the
    /// registry.
    pub fn invalidate_all(&self) {
        let keys: Vec<String> = self.registry.iter().map(|k| k.clone()).collect();
        for key in keys {
            self.entries.remove(&key);
            self.registry.remove(&key);
        }
    }

    /// Number of currently registered keys. Test visibility.
    pub fn tracked_keys(&self) -> usize {
        self.registry.len()
    }

    fn get_live(&self, key: &str) -> Option<CachedValue> {
        let entry = self.entries.get(key)?;
        if entry.expires_at <= Instant::now() {
            drop(entry);
            self.entries.remove(key);
            self.registry.remove(key);
            return None;
        }
        Some(entry.value.clone())
    }

    fn put(&self, key: &str, value: CachedValue, ttl: Duration) {
        self.registry.insert(key.to_string());
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
    }
}

impl Default for FileCache {
    fn default() -> Self {
        Self::new()
    }
}
