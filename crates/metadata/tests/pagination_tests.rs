// Keyset pagination tests: newest-first order, page bound, stability
// across concurrent inserts.

mod common;

use common::{temp_store, test_key};
use docket_core::{FileRecord, PAGE_SIZE};
use docket_metadata::{FileStore, PageCursor};
use std::collections::HashSet;
use time::{Duration, OffsetDateTime};

/// Insert `count` records with strictly decreasing ages so ordering is
/// deterministic.
async fn seed(store: &docket_metadata::SqliteStore, count: usize) -> Vec<FileRecord> {
    let key = test_key();
    let base = OffsetDateTime::now_utc();
    let mut records = Vec::new();
    for i in 0..count {
        let mut record =
            FileRecord::staged(format!("doc-{i}.png"), ".png".to_string(), 1024);
        record.created_on = base - Duration::seconds((count - i) as i64);
        store.insert(&key, &record).await.unwrap();
        records.push(record);
    }
    records
}

#[tokio::test]
async fn test_first_page_is_newest_first_and_bounded() {
    let (store, _dir) = temp_store().await;
    seed(&store, 25).await;

    let page = store.list_page(&test_key(), None).await.unwrap();
    assert_eq!(page.len(), PAGE_SIZE as usize);
    for pair in page.windows(2) {
        assert!(pair[0].created_on >= pair[1].created_on);
    }
}

#[tokio::test]
async fn test_cursor_walk_covers_everything_once() {
    let (store, _dir) = temp_store().await;
    let seeded = seed(&store, 45).await;
    let key = test_key();

    let mut seen = HashSet::new();
    let mut cursor: Option<PageCursor> = None;
    loop {
        let page = store.list_page(&key, cursor).await.unwrap();
        if page.is_empty() {
            break;
        }
        for record in &page {
            assert!(seen.insert(record.id), "record repeated across pages");
        }
        let last = page.last().unwrap();
        cursor = Some(PageCursor::after(last.created_on, last.id).unwrap());
    }

    assert_eq!(seen.len(), seeded.len());
}

#[tokio::test]
async fn test_insert_between_pages_does_not_skip_or_repeat() {
    let (store, _dir) = temp_store().await;
    let seeded = seed(&store, 30).await;
    let key = test_key();

    let first = store.list_page(&key, None).await.unwrap();
    let last = first.last().unwrap();
    let cursor = Some(PageCursor::after(last.created_on, last.id).unwrap());

    // A record arriving now sorts newest; it must not disturb the resumed walk.
    let fresh = FileRecord::staged("late.png".to_string(), ".png".to_string(), 512);
    store.insert(&key, &fresh).await.unwrap();

    let second = store.list_page(&key, cursor).await.unwrap();
    let mut seen: HashSet<_> = first.iter().map(|r| r.id).collect();
    for record in &second {
        assert_ne!(record.id, fresh.id, "new record leaked into an older page");
        assert!(seen.insert(record.id), "record repeated after insert");
    }
    assert_eq!(seen.len(), seeded.len());
}

#[tokio::test]
async fn test_same_timestamp_ties_break_on_id() {
    let (store, _dir) = temp_store().await;
    let key = test_key();
    let now = OffsetDateTime::now_utc();

    for i in 0..3 {
        let mut record = FileRecord::staged(format!("tie-{i}.png"), ".png".to_string(), 1);
        record.created_on = now;
        store.insert(&key, &record).await.unwrap();
    }

    let all = store.list_page(&key, None).await.unwrap();
    assert_eq!(all.len(), 3);

    // Resume after the first row; the remaining two must appear exactly once.
    let cursor = Some(PageCursor::after(all[0].created_on, all[0].id).unwrap());
    let rest = store.list_page(&key, cursor).await.unwrap();
    assert_eq!(rest.len(), 2);
    assert!(rest.iter().all(|r| r.id != all[0].id));
}
