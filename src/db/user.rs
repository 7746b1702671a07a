use crate::models::UserProfile;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::Instrument;

/// Creates or replaces the profile stored for `email`
pub async fn upsert(
    pool: &SqlitePool,
    email: &str,
    first_name: &str,
    last_name: &str,
) -> Result<UserProfile, sqlx::Error> {
    let query_span = tracing::info_span!("Saving user profile");
    let now = Utc::now();
    sqlx::query_as::<_, UserProfile>(
        r#"INSERT INTO users (email, first_name, last_name, created_at, updated_at)
           VALUES (?, ?, ?, ?, ?)
           ON CONFLICT (email)
           DO UPDATE SET first_name = excluded.first_name,
                         last_name = excluded.last_name,
                         updated_at = excluded.updated_at
           RETURNING email, first_name, last_name, created_at, updated_at"#,
    )
    .bind(email)
    .bind(first_name)
    .bind(last_name)
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .instrument(query_span)
    .await
}

pub async fn fetch_by_email(
    pool: &SqlitePool,
    email: &str,
) -> Result<Option<UserProfile>, sqlx::Error> {
    let query_span = tracing::info_span!("Fetch user profile");
    sqlx::query_as::<_, UserProfile>(
        r#"SELECT email, first_name, last_name, created_at, updated_at
           FROM users
           WHERE email = ?"#,
    )
    .bind(email)
    .fetch_optional(pool)
    .instrument(query_span)
    .await
}
