use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QuestionError {
    #[error("Dataset not found: {0}")]
    DatasetNotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type QuestionResult<T> = Result<T, QuestionError>;

/// Convert QuestionError to AppError for standardized HTTP error responses
impl From<QuestionError> for AppError {
    fn from(err: QuestionError) -> Self {
        match err {
            e @ QuestionError::DatasetNotFound(_) => AppError::NotFound(e.to_string()),
            QuestionError::Database(e) => AppError::Database(e),
            QuestionError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for QuestionError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
