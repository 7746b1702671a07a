use crate::configuration::Settings;
use crate::forms;
use crate::helpers::ApiError;
use crate::services::DocumentGenerator;
use crate::views;
use actix_web::{post, web, Responder, Result};
use serde_valid::Validate;

#[tracing::instrument(name = "Generate document.", skip_all, fields(template = %form.template_name))]
#[post("/generate")]
pub async fn generate_handler(
    form: web::Json<forms::DocumentRequest>,
    generator: web::Data<DocumentGenerator>,
    settings: web::Data<Settings>,
) -> Result<impl Responder> {
    let form = form.into_inner();
    form.validate().map_err(ApiError::form_error)?;

    let document = generator
        .generate(&form.template_name, &form.user_inputs, &form.user_query)
        .await
        .map_err(ApiError::from)?;

    Ok(web::Json(views::GeneratedDocumentReply::new(
        settings.download_url(&document.file_name),
        &document.text,
    )))
}
