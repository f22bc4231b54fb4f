//! Wraps teloxide::Bot and implements [`notify_core::Transport`]. Production
//! code talks to the Telegram Bot API; tests substitute another Transport impl.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{
    ChatId, FileId, InlineKeyboardButton, InlineKeyboardMarkup, InputFile, InputMedia,
    InputMediaPhoto, InputMediaVideo, MessageId,
};

use notify_core::{
    ButtonAction, InlineKeyboard, MediaRef, SentMessage, Transport, TransportError,
};

use crate::config::TelegramConfig;

/// Thin wrapper around teloxide::Bot that implements the core Transport port.
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    /// Creates a transport from an existing teloxide Bot.
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    /// Creates a transport from config; a custom API URL must parse.
    pub fn from_config(config: &TelegramConfig) -> Result<Self, TransportError> {
        let mut bot = Bot::new(&config.bot_token);
        if let Some(url) = &config.telegram_api_url {
            let url = url
                .parse()
                .map_err(|_| TransportError::InvalidArgument(format!("invalid API URL: {url}")))?;
            bot = bot.set_api_url(url);
        }
        Ok(Self { bot })
    }

    /// Returns the underlying teloxide::Bot for direct API use when needed.
    pub fn inner(&self) -> &Bot {
        &self.bot
    }
}

fn api_err(e: teloxide::RequestError) -> TransportError {
    TransportError::Api(e.to_string())
}

/// Converts a core inline keyboard to teloxide markup. URL buttons must carry
/// a parseable URL.
fn keyboard_markup(keyboard: &InlineKeyboard) -> Result<InlineKeyboardMarkup, TransportError> {
    let mut rows = Vec::with_capacity(keyboard.rows.len());
    for row in &keyboard.rows {
        let mut buttons = Vec::with_capacity(row.len());
        for button in row {
            let converted = match &button.action {
                ButtonAction::Callback(data) => {
                    InlineKeyboardButton::callback(button.text.clone(), data.clone())
                }
                ButtonAction::Url(url) => {
                    let url = url.parse().map_err(|_| {
                        TransportError::InvalidArgument(format!("invalid button URL: {url}"))
                    })?;
                    InlineKeyboardButton::url(button.text.clone(), url)
                }
            };
            buttons.push(converted);
        }
        rows.push(buttons);
    }
    Ok(InlineKeyboardMarkup::new(rows))
}

fn input_media(media: &MediaRef, caption: Option<&str>) -> InputMedia {
    let file = InputFile::file_id(FileId(media.file_id().to_owned()));
    match media {
        MediaRef::Photo(_) => {
            let mut photo = InputMediaPhoto::new(file);
            if let Some(caption) = caption {
                photo = photo.caption(caption.to_owned());
            }
            InputMedia::Photo(photo)
        }
        MediaRef::Video(_) => {
            let mut video = InputMediaVideo::new(file);
            if let Some(caption) = caption {
                video = video.caption(caption.to_owned());
            }
            InputMedia::Video(video)
        }
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<SentMessage, TransportError> {
        let mut request = self.bot.send_message(ChatId(chat_id), text.to_string());
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(keyboard_markup(keyboard)?);
        }
        let sent = request.await.map_err(api_err)?;
        Ok(SentMessage {
            message_id: sent.id.0,
        })
    }

    async fn send_photo(
        &self,
        chat_id: i64,
        file_id: &str,
        caption: Option<&str>,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<SentMessage, TransportError> {
        let mut request = self
            .bot
            .send_photo(ChatId(chat_id), InputFile::file_id(FileId(file_id.to_owned())));
        if let Some(caption) = caption {
            request = request.caption(caption.to_owned());
        }
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(keyboard_markup(keyboard)?);
        }
        let sent = request.await.map_err(api_err)?;
        Ok(SentMessage {
            message_id: sent.id.0,
        })
    }

    async fn send_video(
        &self,
        chat_id: i64,
        file_id: &str,
        caption: Option<&str>,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<SentMessage, TransportError> {
        let mut request = self
            .bot
            .send_video(ChatId(chat_id), InputFile::file_id(FileId(file_id.to_owned())));
        if let Some(caption) = caption {
            request = request.caption(caption.to_owned());
        }
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(keyboard_markup(keyboard)?);
        }
        let sent = request.await.map_err(api_err)?;
        Ok(SentMessage {
            message_id: sent.id.0,
        })
    }

    async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i32,
        text: &str,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<(), TransportError> {
        let mut request =
            self.bot
                .edit_message_text(ChatId(chat_id), MessageId(message_id), text.to_string());
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(keyboard_markup(keyboard)?);
        }
        request.await.map_err(api_err)?;
        Ok(())
    }

    async fn edit_message_media(
        &self,
        chat_id: i64,
        message_id: i32,
        media: &MediaRef,
        caption: Option<&str>,
        keyboard: Option<&InlineKeyboard>,
    ) -> Result<(), TransportError> {
        let mut request = self.bot.edit_message_media(
            ChatId(chat_id),
            MessageId(message_id),
            input_media(media, caption),
        );
        if let Some(keyboard) = keyboard {
            request = request.reply_markup(keyboard_markup(keyboard)?);
        }
        request.await.map_err(api_err)?;
        Ok(())
    }

    async fn delete_message(&self, chat_id: i64, message_id: i32) -> Result<(), TransportError> {
        self.bot
            .delete_message(ChatId(chat_id), MessageId(message_id))
            .await
            .map_err(api_err)?;
        Ok(())
    }

    async fn delete_messages(
        &self,
        chat_id: i64,
        message_ids: &[i32],
    ) -> Result<(), TransportError> {
        // Each id is deleted independently; the first failure is reported only
        // after every id was attempted.
        let mut first_err = None;
        for &message_id in message_ids {
            if let Err(e) = self.delete_message(chat_id, message_id).await {
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify_core::InlineButton;
    use teloxide::types::InlineKeyboardButtonKind;

    /// **Test: keyboard conversion preserves layout and maps callback and URL
    /// buttons to their teloxide kinds.**
    #[test]
    fn test_keyboard_markup_conversion() {
        let keyboard = InlineKeyboard::new(vec![
            vec![
                InlineButton::callback("Ok", "ack"),
                InlineButton::callback("Close", "delete_notification_1-2-3"),
            ],
            vec![InlineButton::url("Site", "https://example.com")],
        ]);

        let markup = keyboard_markup(&keyboard).unwrap();
        assert_eq!(markup.inline_keyboard.len(), 2);
        assert_eq!(markup.inline_keyboard[0].len(), 2);

        match &markup.inline_keyboard[0][0].kind {
            InlineKeyboardButtonKind::CallbackData(data) => assert_eq!(data, "ack"),
            other => panic!("unexpected kind: {:?}", other),
        }
        match &markup.inline_keyboard[1][0].kind {
            InlineKeyboardButtonKind::Url(url) => assert_eq!(url.as_str(), "https://example.com/"),
            other => panic!("unexpected kind: {:?}", other),
        }
    }

    /// **Test: an unparseable button URL is a permanent invalid-argument
    /// error.**
    #[test]
    fn test_bad_button_url_rejected() {
        let keyboard = InlineKeyboard::new(vec![vec![InlineButton::url("Broken", "not a url")]]);
        let err = keyboard_markup(&keyboard).unwrap_err();
        assert!(matches!(err, TransportError::InvalidArgument(_)));
        assert!(err.is_permanent());
    }
}
