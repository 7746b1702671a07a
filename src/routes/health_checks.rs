use crate::health::HealthChecker;
use actix_web::{get, http::StatusCode, web, HttpResponse, Responder};
use serde_json::json;

#[get("")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().finish()
}

/// Database and connector status; 503 when any component is unhealthy
#[tracing::instrument(name = "Health check components.", skip(checker))]
#[get("/components")]
pub async fn health_components(checker: web::Data<HealthChecker>) -> impl Responder {
    let report = checker.check_all().await;
    let status_code = if report.is_unhealthy() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    HttpResponse::build(status_code).json(report)
}

#[get("/")]
pub async fn root() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "message": "Legal Aid Assistant API is running" }))
}
