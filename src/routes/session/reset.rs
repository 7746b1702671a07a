use crate::forms;
use crate::helpers::ApiError;
use crate::services::SessionRegistry;
use crate::views::StatusReply;
use actix_web::{post, web, Responder, Result};
use serde_valid::Validate;

#[tracing::instrument(name = "Reset session memory.", skip_all, fields(user_id = %form.user_id))]
#[post("/reset")]
pub async fn reset_handler(
    form: web::Json<forms::ResetRequest>,
    registry: web::Data<SessionRegistry>,
) -> Result<impl Responder> {
    let form = form.into_inner();
    form.validate().map_err(ApiError::form_error)?;

    let conversation = registry.get_or_create(&form.user_id).await;
    conversation.lock().await.memory.clear();

    Ok(web::Json(StatusReply::new("Memory cleared")))
}
