use crate::db;
use crate::helpers::ApiError;
use crate::views;
use actix_web::{get, web, Responder, Result};
use sqlx::SqlitePool;

#[tracing::instrument(name = "Chat session messages.", skip(pool))]
#[get("/session/{session_id}")]
pub async fn session_handler(
    path: web::Path<(String,)>,
    pool: web::Data<SqlitePool>,
) -> Result<impl Responder> {
    let session_id = path.into_inner().0;
    let messages = db::chat::get_session_messages(pool.get_ref(), &session_id)
        .await
        .map_err(ApiError::from)?
        .into_iter()
        .map(views::RoleMessage::from)
        .collect();

    Ok(web::Json(views::MessageList { messages }))
}
