use sqlx::SqliteConnection;

use notify_core::{EventContext, Result, Transport};
use storage::{MessageCategory, TrackingStore};

use super::{best_effort_delete, best_effort_delete_many, store_err};

/// Deletes every live tracked notification in the chat (best-effort) and
/// closes their records. Idempotent, like [`super::close_menu`].
pub(crate) async fn close_notification(
    transport: &dyn Transport,
    event: &EventContext,
    conn: &mut SqliteConnection,
) -> Result<()> {
    let chat_id = event.chat_id();
    let live = TrackingStore::live_messages(conn, chat_id, MessageCategory::Notification)
        .await
        .map_err(store_err)?;

    if !live.is_empty() {
        best_effort_delete_many(transport, chat_id, &live).await;
    }
    TrackingStore::close(conn, chat_id, MessageCategory::Notification, &live)
        .await
        .map_err(store_err)?;
    Ok(())
}

/// Dismisses one tracked notification by its correlation key: deletes the
/// remote message (best-effort) and closes the record. Returns whether a
/// record was found and closed; an unknown key is a no-op.
pub(crate) async fn dismiss(
    transport: &dyn Transport,
    key: &str,
    conn: &mut SqliteConnection,
) -> Result<bool> {
    let Some(record) = TrackingStore::find_by_key(conn, key).await.map_err(store_err)? else {
        return Ok(false);
    };

    best_effort_delete(transport, record.chat_id, record.msg_id).await;
    TrackingStore::close_by_key(conn, key).await.map_err(store_err)
}
