use sqlx::SqliteConnection;

use notify_core::{EventContext, NotificationContext, NotifyError, Result, Transport};
use storage::{MessageCategory, TrackingStore};

use super::{best_effort_delete, required_keyboard, store_err};
use crate::keyboard::generate_key;

/// Sends a text message with an inline keyboard and records it as a tracked
/// notification under a freshly minted correlation key.
pub(crate) async fn info(
    transport: &dyn Transport,
    event: &EventContext,
    ctx: &NotificationContext,
    conn: &mut SqliteConnection,
) -> Result<()> {
    let chat_id = event.chat_id();
    let key = generate_key(chat_id);
    let keyboard = required_keyboard(ctx, &key)?;
    let text = ctx
        .text
        .as_deref()
        .ok_or_else(|| NotifyError::Config("info notification requires text".into()))?;

    let sent = transport.send_text(chat_id, text, Some(&keyboard)).await?;

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

/// Deletes the triggering inbound message (best-effort), then runs [`info`].
pub(crate) async fn invalid_input(
    transport: &dyn Transport,
    event: &EventContext,
    ctx: &NotificationContext,
    conn: &mut SqliteConnection,
) -> Result<()> {
    best_effort_delete(transport, event.chat_id(), event.message_id()).await;
    info(transport, event, ctx, conn).await
}

/// Deletes the triggering inbound message and the bot's prior message
/// (best-effort), then runs [`info`].
pub(crate) async fn dialog(
    transport: &dyn Transport,
    event: &EventContext,
    ctx: &NotificationContext,
    conn: &mut SqliteConnection,
) -> Result<()> {
    let chat_id = event.chat_id();
    best_effort_delete(transport, chat_id, event.message_id()).await;
    if let Some(bot_msg_id) = ctx.bot_last_msg_id {
        best_effort_delete(transport, chat_id, bot_msg_id).await;
    }
    info(transport, event, ctx, conn).await
}
