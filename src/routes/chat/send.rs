use crate::forms;
use crate::helpers::ApiError;
use crate::services::{LegalChatbot, SessionRegistry};
use crate::views;
use actix_web::{post, web, Responder, Result};
use serde_valid::Validate;

#[tracing::instrument(name = "Chat.", skip_all, fields(user_id = %form.user_id))]
#[post("")]
pub async fn send_handler(
    form: web::Json<forms::ChatRequest>,
    registry: web::Data<SessionRegistry>,
    chatbot: web::Data<LegalChatbot>,
) -> Result<impl Responder> {
    let form = form.into_inner();
    form.validate().map_err(ApiError::form_error)?;

    let conversation = registry.get_or_create(&form.user_id).await;
    let mut conversation = conversation.lock().await;
    let response = chatbot
        .generate(&mut conversation, &form.user_query)
        .await
        .map_err(|err| {
            tracing::error!("Chatbot failed to answer: {}", err);
            ApiError::from(err)
        })?;

    Ok(web::Json(views::ChatReply { response }))
}
