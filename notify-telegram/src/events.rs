//! Conversions from teloxide update types to core event types.
//! Depends only on teloxide and notify_core type definitions.

use teloxide::types::{CallbackQuery, MediaKind, Message, MessageKind};

use notify_core::{EventContext, MediaRef};

/// Event context of an inbound chat message.
pub fn event_from_message(message: &Message) -> EventContext {
    EventContext::FromMessage {
        chat_id: message.chat.id.0,
        message_id: message.id.0,
    }
}

/// Event context of a callback query. `None` when the query carries no
/// message, which happens for buttons on messages too old to reference.
pub fn event_from_callback(query: &CallbackQuery) -> Option<EventContext> {
    let message = query.message.as_ref()?;
    Some(EventContext::FromCallback {
        chat_id: message.chat().id.0,
        message_id: message.id().0,
    })
}

/// The photo or video carried by a message; photos resolve to their largest
/// size. Other media kinds yield `None`.
pub fn media_ref(message: &Message) -> Option<MediaRef> {
    let MessageKind::Common(common) = &message.kind else {
        return None;
    };
    match &common.media_kind {
        MediaKind::Photo(photo) => photo
            .photo
            .last()
            .map(|size| MediaRef::Photo(size.file.id.to_string())),
        MediaKind::Video(video) => Some(MediaRef::Video(video.video.file.id.to_string())),
        _ => None,
    }
}

/// The album id grouping this message with the rest of its media group.
pub fn media_group_id(message: &Message) -> Option<String> {
    message.media_group_id().map(|id| id.to_string())
}
