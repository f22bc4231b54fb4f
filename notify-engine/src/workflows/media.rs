use sqlx::SqliteConnection;

use notify_core::{EventContext, MediaRef, NotificationContext, NotifyError, Result, Transport};
use storage::{MessageCategory, TrackingStore};

use super::{best_effort_delete, optional_keyboard, store_err};
use crate::keyboard::generate_key;

/// Sends a single media item with an optional caption and keyboard and records
/// it as a tracked notification.
pub(crate) async fn media(
    transport: &dyn Transport,
    event: &EventContext,
    ctx: &NotificationContext,
    conn: &mut SqliteConnection,
) -> Result<()> {
    let chat_id = event.chat_id();
    let key = generate_key(chat_id);
    let keyboard = optional_keyboard(ctx, &key)?;
    let media = ctx.media.as_ref().ok_or_else(|| {
        NotifyError::UnsupportedPayload("media notification requires a media item".into())
    })?;
    let caption = ctx.media_caption.as_deref();

    let sent = match media {
        MediaRef::Photo(file_id) => {
            transport
                .send_photo(chat_id, file_id, caption, keyboard.as_ref())
                .await?
        }
        MediaRef::Video(file_id) => {
            transport
                .send_video(chat_id, file_id, caption, keyboard.as_ref())
                .await?
        }
    };

    TrackingStore::save(
        conn,
        chat_id,
        &[sent.message_id],
        MessageCategory::Notification,
        Some(&key),
    )
    .await
    .map_err(store_err)?;
    Ok(())
}

/// Deletes every message of a rejected media group. Each deletion is
/// independent; one failure does not abort the others.
pub(crate) async fn invalid_media_group(
    transport: &dyn Transport,
    event: &EventContext,
    ctx: &NotificationContext,
) -> Result<()> {
    let chat_id = event.chat_id();
    for msg_id in ctx.media_group_msg_ids.as_deref().unwrap_or(&[]) {
        best_effort_delete(transport, chat_id, *msg_id).await;
    }
    Ok(())
}
