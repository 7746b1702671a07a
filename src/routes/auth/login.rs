use crate::connectors::IdentityConnector;
use crate::db;
use crate::forms;
use crate::helpers::ApiError;
use crate::views;
use actix_web::{post, web, Responder, Result};
use serde_valid::Validate;
use sqlx::SqlitePool;
use std::sync::Arc;

#[tracing::instrument(name = "Log in.", skip_all)]
#[post("/login")]
pub async fn login_handler(
    form: web::Json<forms::LoginForm>,
    identity: web::Data<Arc<dyn IdentityConnector>>,
    pool: web::Data<SqlitePool>,
) -> Result<impl Responder> {
    let form = form.into_inner();
    form.validate().map_err(ApiError::form_error)?;

    let account = identity
        .sign_in(form.email.trim(), &form.password)
        .await
        .map_err(|err| {
            tracing::info!("Login rejected: {}", err);
            ApiError::from(err)
        })?;

    // accounts created outside this service have no profile yet
    let (first_name, last_name) = db::user::fetch_by_email(pool.get_ref(), &account.email)
        .await
        .map_err(ApiError::from)?
        .map(|profile| (profile.first_name, profile.last_name))
        .unwrap_or_else(|| ("User".to_string(), String::new()));

    Ok(web::Json(views::LoginReply {
        message: "Login successful".to_string(),
        first_name,
        last_name,
        user_id: account.local_id,
    }))
}
