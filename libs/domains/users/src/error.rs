use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("A user with that username already exists.")]
    DuplicateUsername(String),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Invalid input: {}", .0.join(" "))]
    InvalidForm(Vec<String>),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;

/// Convert UserError to AppError for standardized HTTP error responses
impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            e @ UserError::DuplicateUsername(_) => AppError::Conflict(e.to_string()),
            e @ UserError::InvalidCredentials => AppError::Unauthorized(e.to_string()),
            e @ UserError::InvalidForm(_) => AppError::BadRequest(e.to_string()),
            UserError::Database(e) => AppError::Database(e),
            UserError::PasswordHash(msg) | UserError::Session(msg) | UserError::Internal(msg) => {
                AppError::InternalServerError(msg)
            }
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
