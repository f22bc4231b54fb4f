//! Notification workflows: one short, linear sequence of transport and store
//! operations per intent.
//!
//! Cleanup of possibly-already-gone remote messages goes through the
//! best-effort wrappers below, which log and continue; the primary send/edit of
//! each workflow propagates its error to the caller.

mod auto_expire;
mod close;
mod info;
mod media;
mod menu;

pub(crate) use auto_expire::auto_expire;
pub(crate) use close::{close_notification, dismiss};
pub(crate) use info::{dialog, info, invalid_input};
pub(crate) use media::{invalid_media_group, media};
pub(crate) use menu::{close_menu, edit_menu, start_menu};

use tracing::debug;

use notify_core::{InlineKeyboard, NotificationContext, NotifyError, Result, Transport};
use storage::StoreError;

use crate::keyboard::callback_keyboard;

/// Deletes a message that may legitimately already be gone; failures are
/// logged and swallowed.
pub(crate) async fn best_effort_delete(transport: &dyn Transport, chat_id: i64, message_id: i32) {
    if let Err(e) = transport.delete_message(chat_id, message_id).await {
        debug!(chat_id, message_id, "Best-effort delete failed: {}", e);
    }
}

/// Bulk variant of [`best_effort_delete`].
pub(crate) async fn best_effort_delete_many(
    transport: &dyn Transport,
    chat_id: i64,
    message_ids: &[i32],
) {
    if let Err(e) = transport.delete_messages(chat_id, message_ids).await {
        debug!(chat_id, count = message_ids.len(), "Best-effort bulk delete failed: {}", e);
    }
}

pub(crate) fn store_err(e: StoreError) -> NotifyError {
    NotifyError::Storage(e.to_string())
}

/// The keyboard for workflows that require one: the prebuilt keyboard from the
/// context, or one built from the button/callback grids under `key`.
pub(crate) fn required_keyboard(ctx: &NotificationContext, key: &str) -> Result<InlineKeyboard> {
    match optional_keyboard(ctx, key)? {
        Some(keyboard) => Ok(keyboard),
        None => Err(NotifyError::Config(
            "either a keyboard or button/callback grids must be provided".into(),
        )),
    }
}

/// The keyboard for workflows where one is optional.
pub(crate) fn optional_keyboard(
    ctx: &NotificationContext,
    key: &str,
) -> Result<Option<InlineKeyboard>> {
    if let Some(keyboard) = &ctx.keyboard {
        return Ok(Some(keyboard.clone()));
    }
    match (&ctx.button_text, &ctx.callback_data) {
        (Some(text), Some(data)) => Ok(Some(callback_keyboard(text, data, key, &ctx.sizes)?)),
        _ => Ok(None),
    }
}
