/// Error types for blog-service
///
/// Every failure a handler can produce is an `AppError`. The actix
/// `ResponseError` impl turns it into a JSON body of the form
/// `{"error": "<CODE>", "message": "<text>"}`; server-side failures are logged
/// here and answered with a generic message.
use crate::db::RepositoryError;
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use crypto_core::jwt::TokenError;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Result type for blog-service operations
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("User already exists")]
    AlreadyExists,

    /// Same message for unknown user and wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON body of every error response
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "NOT_FOUND")]
    pub error: String,
    #[schema(example = "Blog post not found")]
    pub message: String,
}

impl AppError {
    /// Machine-readable error code sent to clients
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::AlreadyExists => "ALREADY_EXISTS",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::Token(TokenError::MissingToken) => "MISSING_TOKEN",
            AppError::Token(TokenError::InvalidToken) => "INVALID_TOKEN",
            AppError::Token(TokenError::ExpiredToken) => "EXPIRED_TOKEN",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Token(TokenError::EmptySecret | TokenError::Signing(_))
            | AppError::Database(_)
            | AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) | AppError::AlreadyExists => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Token(TokenError::MissingToken)
            | AppError::Token(TokenError::InvalidToken)
            | AppError::Token(TokenError::ExpiredToken) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Token(TokenError::EmptySecret | TokenError::Signing(_))
            | AppError::Database(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = if self.is_server_error() {
            // Don't leak internal details to clients
            tracing::error!(error = %self, "Request failed with internal error");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.code().to_string(),
            message,
        })
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Conflict(_) => AppError::AlreadyExists,
            RepositoryError::MissingReference(msg) => AppError::Internal(msg),
            RepositoryError::Database(e) => AppError::Database(e),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::InvalidInput(errors.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("Blocking task failed: {}", err))
    }
}
