use sqlx::SqliteConnection;

use notify_core::{EventContext, MediaRef, NotificationContext, NotifyError, Result, Transport};
use storage::{MessageCategory, TrackingStore};

use super::{best_effort_delete, best_effort_delete_many, store_err};

/// Deletes the triggering inbound message (best-effort), sends the menu as a
/// photo-with-caption or plain text, and records it as the live menu message.
/// Any other payload shape is a hard error.
pub(crate) async fn start_menu(
    transport: &dyn Transport,
    event: &EventContext,
    ctx: &NotificationContext,
    conn: &mut SqliteConnection,
) -> Result<()> {
    let chat_id = event.chat_id();
    best_effort_delete(transport, chat_id, event.message_id()).await;

    let sent = match &ctx.media {
        Some(MediaRef::Photo(file_id)) => {
            transport
                .send_photo(chat_id, file_id, ctx.text.as_deref(), ctx.keyboard.as_ref())
                .await?
        }
        Some(MediaRef::Video(_)) => {
            return Err(NotifyError::UnsupportedPayload(
                "menus support photo media only".into(),
            ))
        }
        None => {
            let text = ctx
                .text
                .as_deref()
                .ok_or_else(|| NotifyError::Config("menu requires text or media".into()))?;
            transport
                .send_text(chat_id, text, ctx.keyboard.as_ref())
                .await?
        }
    };

    TrackingStore::save(conn, chat_id, &[sent.message_id], MessageCategory::Menu, None)
        .await
        .map_err(store_err)?;
    Ok(())
}

/// Edits the active (most recent) live menu message in place. Older live menu
/// records are stale: their remote messages are deleted best-effort and their
/// records closed. Editing cannot silently degrade, so an unsupported payload
/// shape and the no-active-menu case are hard errors.
pub(crate) async fn edit_menu(
    transport: &dyn Transport,
    event: &EventContext,
    ctx: &NotificationContext,
    conn: &mut SqliteConnection,
) -> Result<()> {
    let chat_id = event.chat_id();
    let live = TrackingStore::live_messages(conn, chat_id, MessageCategory::Menu)
        .await
        .map_err(store_err)?;

    let Some((&active, stale)) = live.split_last() else {
        return Err(NotifyError::NoActiveMenu);
    };

    for msg_id in stale {
        best_effort_delete(transport, chat_id, *msg_id).await;
    }
    TrackingStore::close(conn, chat_id, MessageCategory::Menu, stale)
        .await
        .map_err(store_err)?;

    match &ctx.media {
        Some(media @ MediaRef::Photo(_)) => {
            transport
                .edit_message_media(
                    chat_id,
                    active,
                    media,
                    ctx.media_caption.as_deref(),
                    ctx.keyboard.as_ref(),
                )
                .await?
        }
        Some(MediaRef::Video(_)) => {
            return Err(NotifyError::UnsupportedPayload(
                "menus support photo media only".into(),
            ))
        }
        None => {
            let text = ctx
                .text
                .as_deref()
                .ok_or_else(|| NotifyError::Config("menu requires text or media".into()))?;
            transport
                .edit_message_text(chat_id, active, text, ctx.keyboard.as_ref())
                .await?
        }
    }

    Ok(())
}

/// Deletes every live menu message (best-effort) and closes their records.
/// Idempotent: with no live records it deletes and closes nothing.
pub(crate) async fn close_menu(
    transport: &dyn Transport,
    event: &EventContext,
    conn: &mut SqliteConnection,
) -> Result<()> {
    let chat_id = event.chat_id();
    let live = TrackingStore::live_messages(conn, chat_id, MessageCategory::Menu)
        .await
        .map_err(store_err)?;

    if !live.is_empty() {
        best_effort_delete_many(transport, chat_id, &live).await;
    }
    TrackingStore::close(conn, chat_id, MessageCategory::Menu, &live)
        .await
        .map_err(store_err)?;
    Ok(())
}
