//! Type-safe error codes for API responses.
//!
//! Each code carries a SCREAMING_SNAKE_CASE identifier for clients, an integer
//! for logs and alerting, and a default message.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::EmptyInput;
//! assert_eq!(code.as_str(), "EMPTY_INPUT");
//! assert_eq!(code.code(), 1002);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    /// Request was malformed or semantically invalid
    BadRequest,

    /// A required text input was empty or whitespace only
    EmptyInput,

    /// Requested resource was not found
    NotFound,

    /// Authentication credentials are missing or invalid
    Unauthorized,

    /// Request conflicts with current resource state
    Conflict,

    // Server errors (1500-1599)
    /// An unexpected internal server error occurred
    InternalError,

    // Database errors (2000-2999)
    /// Database query failed
    DatabaseError,

    /// Database connection could not be acquired
    DatabaseUnavailable,

    // Model errors (3000-3999)
    /// The embedding model failed to produce output
    ModelError,

    /// The embedding model produced a vector of the wrong shape or with non-finite values
    InvalidEmbedding,

    // Rendering and serialization errors (5000s)
    /// JSON serialization/deserialization error
    SerdeJsonError,

    /// HTML template rendering error
    TemplateError,
}

impl ErrorCode {
    /// Identifier clients can match on.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BadRequest => "BAD_REQUEST",
            Self::EmptyInput => "EMPTY_INPUT",
            Self::NotFound => "NOT_FOUND",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Conflict => "CONFLICT",
            Self::InternalError => "INTERNAL_ERROR",
            Self::DatabaseError => "DATABASE_ERROR",
            Self::DatabaseUnavailable => "DATABASE_UNAVAILABLE",
            Self::ModelError => "MODEL_ERROR",
            Self::InvalidEmbedding => "INVALID_EMBEDDING",
            Self::SerdeJsonError => "SERDE_JSON_ERROR",
            Self::TemplateError => "TEMPLATE_ERROR",
        }
    }

    /// Integer code used in structured logs.
    ///
    /// - 1000-1499: client errors
    /// - 1500-1999: generic server errors
    /// - 2000-2999: database
    /// - 3000-3999: embedding model
    /// - 5000-5999: rendering and serialization
    pub fn code(&self) -> i32 {
        match self {
            Self::BadRequest => 1001,
            Self::EmptyInput => 1002,
            Self::NotFound => 1006,
            Self::Unauthorized => 1007,
            Self::Conflict => 1009,
            Self::InternalError => 1500,
            Self::DatabaseError => 2001,
            Self::DatabaseUnavailable => 2002,
            Self::ModelError => 3001,
            Self::InvalidEmbedding => 3002,
            Self::SerdeJsonError => 5001,
            Self::TemplateError => 5002,
        }
    }

    /// Default user-facing message; handlers may override it.
    pub fn default_message(&self) -> &'static str {
        match self {
            Self::BadRequest => "The request could not be processed",
            Self::EmptyInput => "Input text must not be empty",
            Self::NotFound => "Resource not found",
            Self::Unauthorized => "Authentication required",
            Self::Conflict => "Resource already exists",
            Self::InternalError => "An internal server error occurred",
            Self::DatabaseError => "Database error occurred",
            Self::DatabaseUnavailable => "Database is unavailable",
            Self::ModelError => "The embedding model failed",
            Self::InvalidEmbedding => "The embedding model returned an invalid vector",
            Self::SerdeJsonError => "JSON serialization error",
            Self::TemplateError => "Failed to render page",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
