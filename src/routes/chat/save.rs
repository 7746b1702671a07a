use crate::db;
use crate::forms;
use crate::helpers::ApiError;
use crate::services::SessionRegistry;
use crate::views::StatusReply;
use actix_web::{post, web, Responder, Result};
use serde_valid::Validate;
use sqlx::SqlitePool;

/// Persists the live conversation as a new session. A `session_id` sent along
/// is the session the client was continuing; it is replaced by the new one.
#[tracing::instrument(name = "Save chat.", skip_all, fields(user_id = %form.user_id))]
#[post("/save")]
pub async fn save_handler(
    form: web::Json<forms::SaveChatRequest>,
    registry: web::Data<SessionRegistry>,
    pool: web::Data<SqlitePool>,
) -> Result<impl Responder> {
    let form = form.into_inner();
    form.validate().map_err(ApiError::form_error)?;

    let conversation = registry.get_or_create(&form.user_id).await;
    let messages = conversation.lock().await.memory.to_new_messages();

    let session_id = match db::chat::save_session(pool.get_ref(), &form.user_id, &messages)
        .await
        .map_err(ApiError::from)?
    {
        Some(session_id) => session_id,
        None => {
            return Ok(web::Json(
                StatusReply::new("ignored").with_message("No messages to save"),
            ));
        }
    };

    if let Some(previous) = form
        .session_id
        .as_deref()
        .filter(|previous| !previous.is_empty() && *previous != session_id)
    {
        let deleted = db::chat::delete_session(pool.get_ref(), &form.user_id, previous)
            .await
            .map_err(ApiError::from)?;
        tracing::debug!(previous, deleted, "Replaced previous chat session");
    }

    tracing::info!(%session_id, messages = messages.len(), "Chat session saved");
    Ok(web::Json(StatusReply::new("saved").with_session(session_id)))
}
