use crate::configuration::Settings;
use crate::db;
use crate::forms;
use crate::helpers::ApiError;
use crate::views;
use actix_web::{get, web, Responder, Result};
use sqlx::SqlitePool;

const MAX_HISTORY_LIMIT: i64 = 100;

#[tracing::instrument(name = "Chat history.", skip_all, fields(user_id = %query.user_id))]
#[get("/history")]
pub async fn history_handler(
    query: web::Query<forms::HistoryQuery>,
    pool: web::Data<SqlitePool>,
    settings: web::Data<Settings>,
) -> Result<impl Responder> {
    let limit = query
        .limit
        .unwrap_or(settings.history.recent_limit)
        .clamp(1, MAX_HISTORY_LIMIT);

    let sessions = db::chat::get_recent_sessions(pool.get_ref(), &query.user_id, limit)
        .await
        .map_err(ApiError::from)?
        .into_iter()
        .map(views::SessionSummary::from)
        .collect();

    Ok(web::Json(views::SessionList { sessions }))
}
