use crate::connectors::ConnectorError;
use crate::services::{ChatbotError, DocumentError, TemplateError};
use actix_web::{error, http::StatusCode, HttpRequest, HttpResponse, ResponseError};
use serde_json::json;

/// Error returned by handlers, rendered as `{"detail": "..."}`
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Connector(#[from] ConnectorError),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn internal_server_error(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Validation failure of a request form
    pub fn form_error(errors: impl std::fmt::Display) -> Self {
        Self::BadRequest(errors.to_string())
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Connector(err) => err.status_code(),
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let detail = match self {
            // never leak storage errors to clients
            Self::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };
        HttpResponse::build(self.status_code()).json(json!({ "detail": detail }))
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("Database error: {:?}", err);
        Self::Internal(err.to_string())
    }
}

impl From<TemplateError> for ApiError {
    fn from(err: TemplateError) -> Self {
        match err {
            TemplateError::InvalidName(_) => Self::BadRequest(err.to_string()),
            TemplateError::NotFound(_) => Self::NotFound(err.to_string()),
            other => {
                tracing::error!("Template error: {}", other);
                Self::Internal(other.to_string())
            }
        }
    }
}

impl From<DocumentError> for ApiError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::Template(err) => err.into(),
            DocumentError::Text(msg) => Self::BadRequest(msg),
            other => {
                tracing::error!("Document generation failed: {}", other);
                Self::Internal(other.to_string())
            }
        }
    }
}

impl From<ChatbotError> for ApiError {
    fn from(err: ChatbotError) -> Self {
        match err {
            ChatbotError::Connector(err) => Self::Connector(err),
            ChatbotError::Prompt(msg) => {
                tracing::error!("Prompt error: {}", msg);
                Self::Internal(msg)
            }
        }
    }
}

/// Turns body deserialization failures into 400 `{"detail"}` responses
pub fn json_error_handler(err: error::JsonPayloadError, _req: &HttpRequest) -> error::Error {
    let detail = match &err {
        error::JsonPayloadError::Deserialize(err) => format!(
            "Invalid request body at line {}, column {}: {}",
            err.line(),
            err.column(),
            err
        ),
        other => other.to_string(),
    };
    error::InternalError::from_response(
        err,
        HttpResponse::BadRequest().json(json!({ "detail": detail })),
    )
    .into()
}

/// Same as `json_error_handler`, for query strings
pub fn query_error_handler(err: error::QueryPayloadError, _req: &HttpRequest) -> error::Error {
    let detail = format!("Invalid query string: {}", err);
    error::InternalError::from_response(
        err,
        HttpResponse::BadRequest().json(json!({ "detail": detail })),
    )
    .into()
}
