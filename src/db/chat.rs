use crate::models::{session_preview, ChatSession, NewMessage, StoredMessage};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::Instrument;
use uuid::Uuid;

/// Stores `messages` as a new session of `user_id`.
/// Returns the new session id, or `None` when there is nothing to store.
pub async fn save_session(
    pool: &SqlitePool,
    user_id: &str,
    messages: &[NewMessage],
) -> Result<Option<String>, sqlx::Error> {
    if messages.is_empty() {
        return Ok(None);
    }

    let now = Utc::now();
    let suffix = Uuid::new_v4().simple().to_string();
    let session_id = format!("{}_{}_{}", user_id, now.timestamp(), &suffix[..8]);
    let preview = session_preview(messages);

    let query_span = tracing::info_span!("Saving chat session", %session_id, messages = messages.len());
    async {
        let mut tx = pool.begin().await?;

        sqlx::query(
            r#"INSERT INTO sessions (session_id, user_id, created_at, preview)
               VALUES (?, ?, ?, ?)"#,
        )
        .bind(&session_id)
        .bind(user_id)
        .bind(now)
        .bind(&preview)
        .execute(&mut *tx)
        .await?;

        for message in messages {
            sqlx::query(
                r#"INSERT INTO messages (session_id, type, content, created_at)
                   VALUES (?, ?, ?, ?)"#,
            )
            .bind(&session_id)
            .bind(message.message_type.as_str())
            .bind(&message.content)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await
    }
    .instrument(query_span)
    .await
    .map_err(|err| {
        tracing::error!("Failed to save chat session: {:?}", err);
        err
    })?;

    Ok(Some(session_id))
}

/// The `limit` newest sessions of `user_id`
pub async fn get_recent_sessions(
    pool: &SqlitePool,
    user_id: &str,
    limit: i64,
) -> Result<Vec<ChatSession>, sqlx::Error> {
    let query_span = tracing::info_span!("Fetch recent chat sessions", %user_id, limit);
    sqlx::query_as::<_, ChatSession>(
        r#"SELECT session_id, user_id, created_at, preview
           FROM sessions
           WHERE user_id = ?
           ORDER BY created_at DESC, rowid DESC
           LIMIT ?"#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .instrument(query_span)
    .await
}

/// Messages of a session in the order they were saved; empty for an unknown session
pub async fn get_session_messages(
    pool: &SqlitePool,
    session_id: &str,
) -> Result<Vec<StoredMessage>, sqlx::Error> {
    let query_span = tracing::info_span!("Fetch chat session messages", %session_id);
    sqlx::query_as::<_, StoredMessage>(
        r#"SELECT id, session_id, type, content, created_at
           FROM messages
           WHERE session_id = ?
           ORDER BY id ASC"#,
    )
    .bind(session_id)
    .fetch_all(pool)
    .instrument(query_span)
    .await
}

/// Deletes a session owned by `user_id` together with its messages
pub async fn delete_session(
    pool: &SqlitePool,
    user_id: &str,
    session_id: &str,
) -> Result<u64, sqlx::Error> {
    let query_span = tracing::info_span!("Delete chat session", %user_id, %session_id);
    async {
        let mut tx = pool.begin().await?;

        sqlx::query(
            r#"DELETE FROM messages
               WHERE session_id IN (SELECT session_id FROM sessions WHERE session_id = ? AND user_id = ?)"#,
        )
        .bind(session_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query(r#"DELETE FROM sessions WHERE session_id = ? AND user_id = ?"#)
            .bind(session_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok::<u64, sqlx::Error>(result.rows_affected())
    }
    .instrument(query_span)
    .await
}
