//! # notify-engine
//!
//! Notification lifecycle engine: resolves a [`notify_core::NotificationIntent`]
//! to one workflow over the transport and tracking store, builds inline
//! keyboards, and serves registered menus.

pub mod keyboard;
pub mod menu;
mod notifier;
mod workflows;

pub use keyboard::{callback_keyboard, dismiss_key, generate_key, DISMISS_CALLBACK_PREFIX};
pub use menu::{menu_name, MenuButton, MenuContent, MenuDefinition, MenuRegistry, MENU_CALLBACK_PREFIX};
pub use notifier::Notifier;
