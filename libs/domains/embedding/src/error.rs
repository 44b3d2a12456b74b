use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use core_config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("{0} must not be empty")]
    EmptyInput(&'static str),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Invalid model output: {0}")]
    InvalidOutput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type EmbeddingResult<T> = Result<T, EmbeddingError>;

impl From<reqwest::Error> for EmbeddingError {
    fn from(err: reqwest::Error) -> Self {
        EmbeddingError::Model(err.to_string())
    }
}

impl From<ConfigError> for EmbeddingError {
    fn from(err: ConfigError) -> Self {
        EmbeddingError::Config(err.to_string())
    }
}

impl From<tokio::task::JoinError> for EmbeddingError {
    fn from(err: tokio::task::JoinError) -> Self {
        EmbeddingError::Internal(format!("inference task failed: {}", err))
    }
}

/// Convert EmbeddingError to AppError for standardized HTTP error responses
impl From<EmbeddingError> for AppError {
    fn from(err: EmbeddingError) -> Self {
        match err {
            e @ EmbeddingError::EmptyInput(_) => AppError::EmptyInput(e.to_string()),
            EmbeddingError::Validation(msg) => AppError::BadRequest(msg),
            EmbeddingError::Model(msg) => AppError::Model(msg),
            EmbeddingError::InvalidOutput(msg) => AppError::InvalidEmbedding(msg),
            EmbeddingError::Config(msg) => {
                AppError::InternalServerError(format!("Config error: {}", msg))
            }
            EmbeddingError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for EmbeddingError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
