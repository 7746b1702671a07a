use crate::connectors::IdentityConnector;
use crate::db;
use crate::forms;
use crate::helpers::ApiError;
use crate::views;
use actix_web::{post, web, Responder, Result};
use serde_valid::Validate;
use sqlx::SqlitePool;
use std::sync::Arc;

/// Creates the account with the identity provider, then stores the profile
#[tracing::instrument(name = "Sign up.", skip_all)]
#[post("/signup")]
pub async fn signup_handler(
    form: web::Json<forms::SignupForm>,
    identity: web::Data<Arc<dyn IdentityConnector>>,
    pool: web::Data<SqlitePool>,
) -> Result<impl Responder> {
    let form = form.into_inner();
    form.validate().map_err(ApiError::form_error)?;

    let account = identity
        .sign_up(form.email.trim(), &form.password)
        .await
        .map_err(|err| {
            tracing::info!("Sign up rejected: {}", err);
            ApiError::from(err)
        })?;

    db::user::upsert(
        pool.get_ref(),
        &account.email,
        form.first_name.trim(),
        form.last_name.trim(),
    )
    .await
    .map_err(ApiError::from)?;

    tracing::info!(user_id = %account.local_id, "User signed up");
    Ok(web::Json(views::MessageReply {
        message: "Signup successful".to_string(),
    }))
}
