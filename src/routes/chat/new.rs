use crate::forms;
use crate::helpers::ApiError;
use crate::services::SessionRegistry;
use crate::views::StatusReply;
use actix_web::{post, web, Responder, Result};
use serde_valid::Validate;

/// Starts over: memory and any document being drafted are dropped
#[tracing::instrument(name = "New chat.", skip_all, fields(user_id = %form.user_id))]
#[post("/new")]
pub async fn new_handler(
    form: web::Json<forms::ResetRequest>,
    registry: web::Data<SessionRegistry>,
) -> Result<impl Responder> {
    let form = form.into_inner();
    form.validate().map_err(ApiError::form_error)?;

    let conversation = registry.get_or_create(&form.user_id).await;
    let mut conversation = conversation.lock().await;
    conversation.memory.clear();
    conversation.clear_document_state();
    conversation.touch();

    Ok(web::Json(
        StatusReply::new("success").with_message("New chat started, memory cleared"),
    ))
}
