//! # notify-core
//!
//! Core types and ports for the notification pipeline: [`Transport`], severity and
//! log-channel configuration, the notification intent/context value types, error
//! taxonomy, and tracing initialization. Transport-agnostic; used by log-relay,
//! notify-engine and notify-telegram.

pub mod config;
pub mod error;
pub mod logger;
pub mod transport;
pub mod types;

pub use config::{LogChannelConfig, RelayConfig};
pub use error::{NotifyError, Result, TransportError};
pub use logger::init_tracing;
pub use transport::{SentMessage, Transport};
pub use types::{
    ButtonAction, EventContext, InlineButton, InlineKeyboard, MediaRef, NotificationContext,
    NotificationIntent, Severity,
};
