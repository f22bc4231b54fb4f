//! Inline keyboard construction and correlation-key generation.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

use notify_core::{InlineButton, InlineKeyboard, NotifyError, Result};

/// Callback-data sentinel for buttons that dismiss the notification they are
/// attached to; the correlation key is appended as `delete_notification_{key}`.
pub const DISMISS_CALLBACK_PREFIX: &str = "delete_notification";

static KEY_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Mints a correlation key for a trackable message sent to `chat_id`.
///
/// Keys combine the send time, the chat id and a process-wide counter, so two
/// sends to the same chat within one time unit cannot collide.
pub fn generate_key(chat_id: i64) -> String {
    let seq = KEY_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}-{}", Utc::now().timestamp_micros(), chat_id, seq)
}

/// Extracts the correlation key from dismiss-button callback data.
pub fn dismiss_key(data: &str) -> Option<&str> {
    data.strip_prefix(DISMISS_CALLBACK_PREFIX)
        .and_then(|rest| rest.strip_prefix('_'))
}

/// Builds an inline keyboard from congruent button-text and callback-data
/// grids.
///
/// Both grids must have the same shape and at least one button. The
/// `delete_notification` sentinel gets `_{key}` appended so the dismiss handler
/// can find the tracked record. `sizes` controls how many buttons go on each
/// row; the last size repeats.
pub fn callback_keyboard(
    button_text: &[Vec<String>],
    callback_data: &[Vec<String>],
    key: &str,
    sizes: &[usize],
) -> Result<InlineKeyboard> {
    if button_text.len() != callback_data.len() {
        return Err(NotifyError::Config(
            "button_text and callback_data must have the same structure".into(),
        ));
    }

    let mut buttons = Vec::new();
    for (row_text, row_data) in button_text.iter().zip(callback_data) {
        if row_text.len() != row_data.len() {
            return Err(NotifyError::Config(
                "each row in button_text and callback_data must have the same length".into(),
            ));
        }
        for (text, data) in row_text.iter().zip(row_data) {
            let final_data = if data == DISMISS_CALLBACK_PREFIX {
                format!("{}_{}", data, key)
            } else {
                data.clone()
            };
            buttons.push(InlineButton::callback(text.clone(), final_data));
        }
    }

    if buttons.is_empty() {
        return Err(NotifyError::Config(
            "button_text and callback_data must contain at least one button".into(),
        ));
    }

    Ok(chunk_rows(buttons, sizes))
}

/// Lays buttons out into rows per `sizes`; the last size repeats, and a zero
/// size is treated as one button per row.
pub(crate) fn chunk_rows(buttons: Vec<InlineButton>, sizes: &[usize]) -> InlineKeyboard {
    let mut rows = Vec::new();
    let mut iter = buttons.into_iter().peekable();
    let mut row_index = 0;

    while iter.peek().is_some() {
        let size = sizes
            .get(row_index)
            .or_else(|| sizes.last())
            .copied()
            .unwrap_or(1)
            .max(1);
        let row: Vec<InlineButton> = iter.by_ref().take(size).collect();
        rows.push(row);
        row_index += 1;
    }

    InlineKeyboard::new(rows)
}
