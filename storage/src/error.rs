//! Storage error types.

use thiserror::Error;

/// Errors that can occur when using the tracking store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Correlation key already in use: {0}")]
    KeyCollision(String),
}
