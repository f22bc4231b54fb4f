//! Transport port for the remote messaging API.
//!
//! [`Transport`] is the seam between the pipeline and the real messaging backend;
//! notify-telegram implements it via teloxide, tests substitute recording fakes.

use async_trait::async_trait;

use crate::error::TransportError;
use crate::types::{InlineKeyboard, MediaRef};

/// A message accepted by the remote API, identified for later edits/deletes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentMessage {
    pub message_id: i32,
}

/// Send/edit/delete primitives of the remote messaging API.
///
/// Every failure is potentially transient except
/// [`TransportError::InvalidArgument`], which is permanent.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends a text message, optionally with an inline keyboard.
    async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<SentMessage, TransportError>;

    /// Sends a photo by file id with an optional caption and keyboard.
    async fn send_photo(
        &self,
        chat_id: i64,
        file_id: &str,
        caption: Option<&str>,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<SentMessage, TransportError>;

    /// Sends a video by file id with an optional caption and keyboard.
    async fn send_video(
        &self,
        chat_id: i64,
        file_id: &str,
        caption: Option<&str>,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<SentMessage, TransportError>;

    /// Edits the text (and keyboard) of an already-sent message.
    async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i32,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<(), TransportError>;

    /// Replaces the media (and keyboard) of an already-sent message.
    async fn edit_message_media(
        &self,
        chat_id: i64,
        message_id: i32,
        media: &MediaRef,
        caption: Option<&str>,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<(), TransportError>;

    /// Deletes a single message.
    async fn delete_message(&self, chat_id: i64, message_id: i32) -> Result<(), TransportError>;

    /// Deletes several messages. Implementations delete each id independently;
    /// the first failure is reported after all ids were attempted.
    async fn delete_messages(
        &self,
        chat_id: i64,
        message_ids: &[i32],
    ) -> Result<(), TransportError>;
}
