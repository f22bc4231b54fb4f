//! # log-relay
//!
//! Background delivery of log lines to a chat through the [`notify_core::Transport`]
//! port: multi-producer queue, single consumer loop, batched draining with rate
//! limiting and bounded linear-backoff retry.

mod entry;
mod relay;

pub use entry::LogEntry;
pub use relay::{LogRelay, RelayError};
