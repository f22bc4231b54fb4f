//! Integration tests for [`storage::TrackingStore`].
//!
//! Covers saving/listing/closing records per (chat, category), correlation-key
//! lookup and collision, and transaction rollback, using a throwaway SQLite
//! database file.

use storage::{MessageCategory, SqlitePoolManager, StoreError, TrackingStore};
use tempfile::TempDir;

async fn setup() -> (TempDir, SqlitePoolManager) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = dir.path().join("tracking.db");
    let pool = SqlitePoolManager::new(db_path.to_str().unwrap())
        .await
        .expect("Failed to create pool");
    TrackingStore::init(pool.pool())
        .await
        .expect("Failed to init schema");
    (dir, pool)
}

/// **Test: Saved messages are listed for their (chat, category) only, oldest first.**
#[tokio::test]
async fn test_save_and_live_messages_scoped() {
    let (_dir, pool) = setup().await;
    let mut tx = pool.begin().await.unwrap();

    TrackingStore::save(&mut tx, 1, &[10, 11], MessageCategory::Menu, None)
        .await
        .unwrap();
    TrackingStore::save(&mut tx, 1, &[20], MessageCategory::Notification, Some("k-20"))
        .await
        .unwrap();
    TrackingStore::save(&mut tx, 2, &[30], MessageCategory::Menu, None)
        .await
        .unwrap();

    let menus = TrackingStore::live_messages(&mut tx, 1, MessageCategory::Menu)
        .await
        .unwrap();
    assert_eq!(menus, vec![10, 11]);

    let notifications = TrackingStore::live_messages(&mut tx, 1, MessageCategory::Notification)
        .await
        .unwrap();
    assert_eq!(notifications, vec![20]);

    let other_chat = TrackingStore::live_messages(&mut tx, 2, MessageCategory::Menu)
        .await
        .unwrap();
    assert_eq!(other_chat, vec![30]);
}

/// **Test: close removes only the given ids and reports whether anything was removed.**
#[tokio::test]
async fn test_close_reports_removal() {
    let (_dir, pool) = setup().await;
    let mut tx = pool.begin().await.unwrap();

    TrackingStore::save(&mut tx, 1, &[10, 11, 12], MessageCategory::Menu, None)
        .await
        .unwrap();

    let removed = TrackingStore::close(&mut tx, 1, MessageCategory::Menu, &[10, 11])
        .await
        .unwrap();
    assert!(removed);

    let remaining = TrackingStore::live_messages(&mut tx, 1, MessageCategory::Menu)
        .await
        .unwrap();
    assert_eq!(remaining, vec![12]);

    // Second close over the same ids is a no-op, not an error.
    let removed_again = TrackingStore::close(&mut tx, 1, MessageCategory::Menu, &[10, 11])
        .await
        .unwrap();
    assert!(!removed_again);

    let removed_empty = TrackingStore::close(&mut tx, 1, MessageCategory::Menu, &[])
        .await
        .unwrap();
    assert!(!removed_empty);
}

/// **Test: correlation keys resolve to their record; a reused key is a hard error.**
#[tokio::test]
async fn test_correlation_key_lookup_and_collision() {
    let (_dir, pool) = setup().await;
    let mut tx = pool.begin().await.unwrap();

    TrackingStore::save(&mut tx, 1, &[10], MessageCategory::Notification, Some("key-1"))
        .await
        .unwrap();

    let record = TrackingStore::find_by_key(&mut tx, "key-1")
        .await
        .unwrap()
        .expect("record should exist");
    assert_eq!(record.chat_id, 1);
    assert_eq!(record.msg_id, 10);
    assert_eq!(record.category, "notification");

    let err = TrackingStore::save(&mut tx, 2, &[99], MessageCategory::Notification, Some("key-1"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::KeyCollision(k) if k == "key-1"));
}

/// **Test: close_by_key removes the record and is a no-op for unknown keys.**
#[tokio::test]
async fn test_close_by_key() {
    let (_dir, pool) = setup().await;
    let mut tx = pool.begin().await.unwrap();

    TrackingStore::save(&mut tx, 1, &[10], MessageCategory::Notification, Some("key-1"))
        .await
        .unwrap();

    assert!(TrackingStore::close_by_key(&mut tx, "key-1").await.unwrap());
    assert!(!TrackingStore::close_by_key(&mut tx, "key-1").await.unwrap());
    assert!(TrackingStore::find_by_key(&mut tx, "key-1")
        .await
        .unwrap()
        .is_none());
}

/// **Test: mutations made on a dropped (rolled back) transaction are not visible.**
#[tokio::test]
async fn test_rollback_discards_mutations() {
    let (_dir, pool) = setup().await;

    {
        let mut tx = pool.begin().await.unwrap();
        TrackingStore::save(&mut tx, 1, &[10], MessageCategory::Menu, None)
            .await
            .unwrap();
        // Dropped without commit.
    }

    let mut tx = pool.begin().await.unwrap();
    let live = TrackingStore::live_messages(&mut tx, 1, MessageCategory::Menu)
        .await
        .unwrap();
    assert!(live.is_empty());
}

/// **Test: committed mutations survive into the next transaction.**
#[tokio::test]
async fn test_commit_persists_mutations() {
    let (_dir, pool) = setup().await;

    let mut tx = pool.begin().await.unwrap();
    TrackingStore::save(&mut tx, 1, &[10], MessageCategory::Menu, None)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let mut tx = pool.begin().await.unwrap();
    let live = TrackingStore::live_messages(&mut tx, 1, MessageCategory::Menu)
        .await
        .unwrap();
    assert_eq!(live, vec![10]);
}
