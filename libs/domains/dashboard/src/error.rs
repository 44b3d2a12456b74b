use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use core_config::ConfigError;
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Invalid embedding: {0}")]
    InvalidEmbedding(String),

    #[error("Projection error: {0}")]
    Projection(String),

    #[error("Rendering error: {0}")]
    Render(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type DashboardResult<T> = Result<T, DashboardError>;

impl From<tokio::task::JoinError> for DashboardError {
    fn from(err: tokio::task::JoinError) -> Self {
        DashboardError::Internal(format!("projection task failed: {}", err))
    }
}

/// Convert DashboardError to AppError for standardized HTTP error responses
impl From<DashboardError> for AppError {
    fn from(err: DashboardError) -> Self {
        match err {
            DashboardError::Database(e) => AppError::Database(e),
            DashboardError::Serialization(e) => AppError::SerdeJson(e),
            DashboardError::InvalidEmbedding(msg) => AppError::InvalidEmbedding(msg),
            other => AppError::InternalServerError(other.to_string()),
        }
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
