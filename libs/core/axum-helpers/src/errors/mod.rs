pub mod codes;
pub mod handlers;

pub use codes::ErrorCode;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Standard error response body.
///
/// ```json
/// {
///   "code": 1002,
///   "error": "EMPTY_INPUT",
///   "message": "question must not be empty"
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable error identifier
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Optional structured details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application error type that can be converted to HTTP responses.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("JSON serialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Template error: {0}")]
    Template(#[from] handlebars::RenderError),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Invalid embedding: {0}")]
    InvalidEmbedding(String),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),}

impl AppError {
    /// Error code reported for this error.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            AppError::SerdeJson(_) => ErrorCode::SerdeJsonError,
            AppError::Database(e) => database_error_code(e),
            AppError::Template(_) => ErrorCode::TemplateError,
            AppError::BadRequest(_) => ErrorCode::BadRequest,
            AppError::EmptyInput(_) => ErrorCode::EmptyInput,
            AppError::Unauthorized(_) => ErrorCode::Unauthorized,
            AppError::NotFound(_) => ErrorCode::NotFound,
            AppError::Conflict(_) => ErrorCode::Conflict,
            AppError::Model(_) => ErrorCode::ModelError,
            AppError::InvalidEmbedding(_) => ErrorCode::InvalidEmbedding,
            AppError::InternalServerError(_) => ErrorCode::InternalError,
        }
    }

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) | AppError::EmptyInput(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(DbErr::RecordNotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Database(DbErr::ConnectionAcquire(_) | DbErr::Conn(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::SerdeJson(_)
            | AppError::Database(_)
            | AppError::Template(_)
            | AppError::Model(_)
            | AppError::InvalidEmbedding(_)
            | AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn database_error_code(error: &DbErr) -> ErrorCode {
    match error {
        DbErr::RecordNotFound(_) => ErrorCode::NotFound,
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => ErrorCode::DatabaseUnavailable,
        _ => ErrorCode::DatabaseError,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.error_code();

        // Internal details are logged, never returned to the client.
        let message = match self {
            AppError::BadRequest(msg)
            | AppError::EmptyInput(msg)
            | AppError::Unauthorized(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => {
                tracing::info!(error_code = code.code(), status = %status, "{}", msg);
                msg
            }
            other => {
                tracing::error!(error_code = code.code(), "{}", other);
                code.default_message().to_string()
            }
        };

        let body = Json(ErrorResponse {
            code: code.code(),
            error: code.as_str().to_string(),
            message,
            details: None,
        });

        (status, body).into_response()
    }
}

/// Builds an error response without going through [`AppError`].
pub fn error_response(status: StatusCode, message: String, error_code: ErrorCode) -> Response {
    let body = Json(ErrorResponse {
        code: error_code.code(),
        error: error_code.as_str().to_string(),
        message,
        details: None,
    });

    (status, body).into_response()
}
