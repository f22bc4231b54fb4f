//! SQLite connection pool wrapper and transaction boundary.

use std::str::FromStr;

use sqlx::{sqlite::SqliteConnectOptions, Sqlite, SqlitePool, Transaction};
use tracing::info;

/// Manages a single SQLite pool; creates the DB file if missing.
///
/// One ambient transaction is opened per inbound event via [`begin`]; every store
/// mutation made while handling that event commits or rolls back together.
///
/// [`begin`]: SqlitePoolManager::begin
#[derive(Clone)]
pub struct SqlitePoolManager {
    pool: SqlitePool,
}

impl SqlitePoolManager {
    /// Creates a pool for the given database URL (file path or in-memory).
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        info!("Initializing SQLite pool: {}", database_url);

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        let pool = SqlitePool::connect_with(options).await?;

        Ok(Self { pool })
    }

    /// Returns the underlying pool for running queries.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Opens the ambient transaction for one inbound event. The caller commits
    /// after the event is fully handled; dropping rolls back.
    pub async fn begin(&self) -> Result<Transaction<'_, Sqlite>, sqlx::Error> {
        self.pool.begin().await
    }
}
