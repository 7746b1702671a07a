use crate::services::DocumentGenerator;
use crate::views;
use actix_web::{get, web, Responder, Result};

#[tracing::instrument(name = "List templates.", skip(generator))]
#[get("/templates")]
pub async fn list_handler(generator: web::Data<DocumentGenerator>) -> Result<impl Responder> {
    let templates = generator
        .catalog()
        .list()
        .await
        .into_iter()
        .map(views::TemplateSummary::from)
        .collect();

    Ok(web::Json(views::TemplateList { templates }))
}
