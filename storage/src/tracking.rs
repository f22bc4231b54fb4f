//! Tracking store: which remote messages are currently live per chat.
//!
//! Workflows record every trackable message they send here and close records when
//! the remote message is deleted or superseded. All operations run on the ambient
//! transaction supplied by the caller; the store never commits or rolls back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::StoreError;

/// Classification of a tracked message, determining which cleanup workflow
/// manages it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageCategory {
    Notification,
    Menu,
}

impl MessageCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageCategory::Notification => "notification",
            MessageCategory::Menu => "menu",
        }
    }
}

/// One live remote message owned by the store.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TrackedMessage {
    pub id: i64,
    pub chat_id: i64,
    pub msg_id: i32,
    pub category: String,
    pub correlation_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Persistence API over the `tracked_messages` table.
pub struct TrackingStore;

impl TrackingStore {
    /// Creates the table and indexes if they do not exist.
    pub async fn init(pool: &SqlitePool) -> Result<(), sqlx::Error> {
        info!("Creating tracking tables if not exist");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tracked_messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                chat_id INTEGER NOT NULL,
                msg_id INTEGER NOT NULL,
                category TEXT NOT NULL,
                correlation_key TEXT UNIQUE,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_tracked_chat_category
                ON tracked_messages(chat_id, category)
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Appends records for the given message ids. The correlation key, when
    /// present, applies to every inserted row and must be unused; a collision
    /// with an existing key is a hard error.
    pub async fn save(
        conn: &mut SqliteConnection,
        chat_id: i64,
        msg_ids: &[i32],
        category: MessageCategory,
        correlation_key: Option<&str>,
    ) -> Result<(), StoreError> {
        for msg_id in msg_ids {
            sqlx::query(
                r#"
                INSERT INTO tracked_messages (chat_id, msg_id, category, correlation_key, created_at)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(chat_id)
            .bind(msg_id)
            .bind(category.as_str())
            .bind(correlation_key)
            .bind(Utc::now())
            .execute(&mut *conn)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    StoreError::KeyCollision(correlation_key.unwrap_or_default().to_string())
                }
                _ => StoreError::Database(e),
            })?;
        }

        debug!(
            chat_id,
            category = category.as_str(),
            count = msg_ids.len(),
            "Tracked messages saved"
        );
        Ok(())
    }

    /// Message ids of all live records for a (chat, category), oldest first.
    pub async fn live_messages(
        conn: &mut SqliteConnection,
        chat_id: i64,
        category: MessageCategory,
    ) -> Result<Vec<i32>, StoreError> {
        let rows: Vec<(i32,)> = sqlx::query_as(
            "SELECT msg_id FROM tracked_messages WHERE chat_id = ? AND category = ? ORDER BY id",
        )
        .bind(chat_id)
        .bind(category.as_str())
        .fetch_all(conn)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Closes the records for the given message ids. Returns whether anything
    /// was removed.
    pub async fn close(
        conn: &mut SqliteConnection,
        chat_id: i64,
        category: MessageCategory,
        msg_ids: &[i32],
    ) -> Result<bool, StoreError> {
        if msg_ids.is_empty() {
            return Ok(false);
        }

        let placeholders = vec!["?"; msg_ids.len()].join(", ");
        let sql = format!(
            "DELETE FROM tracked_messages WHERE chat_id = ? AND category = ? AND msg_id IN ({})",
            placeholders
        );

        let mut query = sqlx::query(&sql).bind(chat_id).bind(category.as_str());
        for msg_id in msg_ids {
            query = query.bind(msg_id);
        }

        let result = query.execute(conn).await.map_err(StoreError::Database)?;
        debug!(
            chat_id,
            category = category.as_str(),
            removed = result.rows_affected(),
            "Tracked messages closed"
        );
        Ok(result.rows_affected() > 0)
    }

    /// Looks up a single record by its correlation key.
    pub async fn find_by_key(
        conn: &mut SqliteConnection,
        key: &str,
    ) -> Result<Option<TrackedMessage>, StoreError> {
        let record = sqlx::query_as::<_, TrackedMessage>(
            "SELECT * FROM tracked_messages WHERE correlation_key = ?",
        )
        .bind(key)
        .fetch_optional(conn)
        .await?;

        Ok(record)
    }

    /// Closes the record with the given correlation key. Returns whether a
    /// record was removed.
    pub async fn close_by_key(conn: &mut SqliteConnection, key: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM tracked_messages WHERE correlation_key = ?")
            .bind(key)
            .execute(conn)
            .await
            .map_err(StoreError::Database)?;

        Ok(result.rows_affected() > 0)
    }
}
