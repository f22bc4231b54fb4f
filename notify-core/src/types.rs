//! Core value types: severity levels, inbound event context, notification intents
//! and the per-call notification context.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Severity of a log entry shipped through the delivery channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    /// Uppercase label used in formatted channel messages.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "warning" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            "critical" => Ok(Severity::Critical),
            other => Err(format!(
                "Invalid logging level: {other}. Valid: debug, info, warning, error, critical"
            )),
        }
    }
}

/// The inbound event a notification call originates from.
///
/// Replaces message-or-callback dynamic dispatch with a closed union; `chat_id`
/// and `message_id` are plain accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventContext {
    /// Triggered by an inbound chat message.
    FromMessage { chat_id: i64, message_id: i32 },
    /// Triggered by a callback query; `message_id` is the message the callback
    /// keyboard was attached to.
    FromCallback { chat_id: i64, message_id: i32 },
}

impl EventContext {
    pub fn chat_id(&self) -> i64 {
        match *self {
            EventContext::FromMessage { chat_id, .. } => chat_id,
            EventContext::FromCallback { chat_id, .. } => chat_id,
        }
    }

    pub fn message_id(&self) -> i32 {
        match *self {
            EventContext::FromMessage { message_id, .. } => message_id,
            EventContext::FromCallback { message_id, .. } => message_id,
        }
    }
}

/// A media item referenced by its remote file id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaRef {
    Photo(String),
    Video(String),
}

impl MediaRef {
    pub fn file_id(&self) -> &str {
        match self {
            MediaRef::Photo(id) => id,
            MediaRef::Video(id) => id,
        }
    }
}

/// What pressing an inline button does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonAction {
    Callback(String),
    Url(String),
}

/// One inline keyboard button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineButton {
    pub text: String,
    pub action: ButtonAction,
}

impl InlineButton {
    pub fn callback(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action: ButtonAction::Callback(data.into()),
        }
    }

    pub fn url(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action: ButtonAction::Url(url.into()),
        }
    }
}

/// Transport-agnostic inline keyboard: rows of buttons.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineKeyboard {
    pub rows: Vec<Vec<InlineButton>>,
}

impl InlineKeyboard {
    pub fn new(rows: Vec<Vec<InlineButton>>) -> Self {
        Self { rows }
    }
}

/// The semantic kind of notification requested by a caller.
///
/// Each variant maps to exactly one workflow in notify-engine:
///
/// - `AutoExpire`: sends a self-destructing message.
/// - `Info`: sends a message with an inline keyboard, tracked for dismissal.
/// - `InvalidInput`: deletes the user's last message, then runs `Info`.
/// - `InvalidMediaGroup`: deletes a media group.
/// - `StartMenu`: launches the menu.
/// - `EditMenu`: edits the active menu in place.
/// - `CloseMenu`: closes the menu.
/// - `CloseNotification`: closes all recent notifications.
/// - `Dialog`: deletes the last user and bot messages, then runs `Info`.
/// - `Media` / `MediaApart` / `MediaGroup`: sends a single media item with an
///   optional caption and keyboard, tracked for dismissal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationIntent {
    AutoExpire,
    Info,
    InvalidInput,
    InvalidMediaGroup,
    StartMenu,
    EditMenu,
    CloseMenu,
    CloseNotification,
    Dialog,
    Media,
    MediaApart,
    MediaGroup,
}

/// All optional parameters of a single notification request.
///
/// Built per call, never persisted, never mutated after construction.
#[derive(Debug, Clone)]
pub struct NotificationContext {
    pub text: Option<String>,
    pub media: Option<MediaRef>,
    pub media_caption: Option<String>,
    pub keyboard: Option<InlineKeyboard>,
    pub button_text: Option<Vec<Vec<String>>>,
    pub callback_data: Option<Vec<Vec<String>>>,
    pub sizes: Vec<usize>,
    pub media_group_msg_ids: Option<Vec<i32>>,
    pub bot_last_msg_id: Option<i32>,
    pub delay: Duration,
}

impl Default for NotificationContext {
    fn default() -> Self {
        Self {
            text: None,
            media: None,
            media_caption: None,
            keyboard: None,
            button_text: None,
            callback_data: None,
            sizes: vec![1],
            media_group_msg_ids: None,
            bot_last_msg_id: None,
            delay: Duration::from_secs(1),
        }
    }
}

impl NotificationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn media(mut self, media: MediaRef) -> Self {
        self.media = Some(media);
        self
    }

    pub fn media_caption(mut self, caption: impl Into<String>) -> Self {
        self.media_caption = Some(caption.into());
        self
    }

    pub fn keyboard(mut self, keyboard: InlineKeyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }

    /// Raw button/callback-data grids the info and media workflows build a
    /// keyboard from. Both grids must have the same shape.
    pub fn buttons(mut self, button_text: Vec<Vec<String>>, callback_data: Vec<Vec<String>>) -> Self {
        self.button_text = Some(button_text);
        self.callback_data = Some(callback_data);
        self
    }

    /// How many buttons go on each keyboard row; the last size repeats.
    pub fn sizes(mut self, sizes: Vec<usize>) -> Self {
        self.sizes = sizes;
        self
    }

    pub fn media_group_msg_ids(mut self, ids: Vec<i32>) -> Self {
        self.media_group_msg_ids = Some(ids);
        self
    }

    pub fn bot_last_msg_id(mut self, id: i32) -> Self {
        self.bot_last_msg_id = Some(id);
        self
    }

    /// How long an `AutoExpire` message stays before deletion.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}
