//! Storage crate: durable tracking of live remote messages.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`tracking`] – TrackedMessage, MessageCategory, TrackingStore
//! - [`sqlite_pool`] – SqlitePoolManager (pool + transaction boundary)

mod error;
mod sqlite_pool;
mod tracking;

pub use error::StoreError;
pub use sqlite_pool::SqlitePoolManager;
pub use tracking::{MessageCategory, TrackedMessage, TrackingStore};
