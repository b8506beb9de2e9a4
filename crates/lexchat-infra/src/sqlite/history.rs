//! SQLite history store implementation.
//!
//! Implements `HistoryStore` from `lexchat-core` with raw sqlx queries,
//! a private Row struct, and the split reader/writer pool.

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::Row;
use uuid::Uuid;

use lexchat_core::chat::repository::HistoryStore;
use lexchat_types::chat::{ChatMessage, MessageRole};
use lexchat_types::error::RepositoryError;
use lexchat_types::identity::OwnerId;

use super::pool::DatabasePool;

/// SQLite-backed conversation log.
#[derive(Clone)]
pub struct SqliteHistoryStore {
    pool: DatabasePool,
}

impl SqliteHistoryStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct ChatMessageRow {
    id: String,
    owner_id: String,
    role: String,
    content: String,
    created_at: String,
}

impl ChatMessageRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            owner_id: row.try_get("owner_id")?,
            role: row.try_get("role")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_message(self) -> Result<ChatMessage, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid message id: {e}")))?;
        let owner_id: OwnerId = self
            .owner_id
            .parse()
            .map_err(|e| RepositoryError::Query(format!("invalid owner_id: {e}")))?;
        let role: MessageRole = self
            .role
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;
        let created_at = parse_datetime(&self.created_at)?;

        Ok(ChatMessage {
            id,
            owner_id,
            role,
            content: self.content,
            created_at,
        })
    }
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

/// Fixed-width RFC 3339 so that text ordering matches time ordering.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl HistoryStore for SqliteHistoryStore {
    async fn append(&self, message: &ChatMessage) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO chat_messages (id, owner_id, role, content, created_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(message.id.to_string())
        .bind(message.owner_id.to_string())
        .bind(message.role.to_string())
        .bind(&message.content)
        .bind(format_datetime(&message.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn read_ordered(
        &self,
        owner: &OwnerId,
        limit: u32,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        // Newest `limit` rows, flipped back to chronological order.
        let rows = sqlx::query(
            r#"SELECT id, owner_id, role, content, created_at FROM (
                   SELECT id, owner_id, role, content, created_at
                   FROM chat_messages
                   WHERE owner_id = ?
                   ORDER BY created_at DESC, id DESC
                   LIMIT ?
               )
               ORDER BY created_at ASC, id ASC"#,
        )
        .bind(owner.to_string())
        .bind(i64::from(limit))
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut messages = Vec::with_capacity(rows.len());
        for row in &rows {
            let msg_row =
                ChatMessageRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            messages.push(msg_row.into_message()?);
        }

        Ok(messages)
    }
}
