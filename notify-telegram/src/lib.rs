//! # notify-telegram
//!
//! Telegram backend layer: [`notify_core::Transport`] implementation over
//! teloxide, conversions from teloxide updates to core event types, minimal
//! config. Handles only Telegram connectivity; no lifecycle or storage logic.

mod config;
mod events;
mod transport;

pub use config::TelegramConfig;
pub use events::{event_from_callback, event_from_message, media_group_id, media_ref};
pub use transport::TelegramTransport;
