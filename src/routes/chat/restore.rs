use crate::forms;
use crate::helpers::ApiError;
use crate::models::MessageType;
use crate::services::SessionRegistry;
use crate::views::StatusReply;
use actix_web::{post, web, Responder, Result};
use serde_valid::Validate;

/// Replaces the live memory of a user with a previously saved transcript
#[tracing::instrument(name = "Restore chat.", skip_all, fields(user_id = %form.user_id))]
#[post("/restore")]
pub async fn restore_handler(
    form: web::Json<forms::RestoreRequest>,
    registry: web::Data<SessionRegistry>,
) -> Result<impl Responder> {
    let form = form.into_inner();
    form.validate().map_err(ApiError::form_error)?;

    let conversation = registry.get_or_create(&form.user_id).await;
    let mut conversation = conversation.lock().await;
    conversation.memory.clear();
    conversation.clear_document_state();

    for message in form.messages {
        match MessageType::from_role(&message.role) {
            Some(message_type) => conversation.memory.push(message_type, message.content),
            None => tracing::debug!(role = %message.role, "Skipping message with unknown role"),
        }
    }
    conversation.touch();

    Ok(web::Json(
        StatusReply::new("success").with_message("Chat history restored"),
    ))
}
