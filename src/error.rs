//! Application error taxonomy and its HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::validation::FieldViolation;

/// Errors surfaced by the service layer and mapped to HTTP by handlers.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or missing input.
    #[error("{message}")]
    Validation {
        message: String,
        violations: Vec<FieldViolation>,
    },

    /// Unique constraint violated.
    #[error("{0}")]
    Duplicate(String),

    /// Unknown email or wrong password. Never says which.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Missing or unusable bearer token.
    #[error("{message}")]
    Unauthorized {
        code: &'static str,
        message: &'static str,
    },

    /// Referenced record does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation {
            message: message.into(),
            violations: Vec::new(),
        }
    }

    /// Request body failed schema validation.
    pub fn invalid_body(violations: Vec<FieldViolation>) -> Self {
        AppError::Validation {
            message: "Request validation failed".to_string(),
            violations,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Duplicate(_) => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::Unauthorized { .. } => {
                StatusCode::UNAUTHORIZED
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "validation_failed",
            AppError::Duplicate(_) => "already_exists",
            AppError::InvalidCredentials => "invalid_credentials",
            AppError::Unauthorized { code, .. } => code,
            AppError::NotFound(_) => "not_found",
            AppError::Database(_) | AppError::Internal(_) => "internal_error",
        }
    }
}

/// Store-native errors are classified here, once, for every repository.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        use sqlx::error::ErrorKind;

        if let sqlx::Error::Database(db_err) = &err {
            match db_err.kind() {
                ErrorKind::UniqueViolation => {
                    return AppError::Duplicate("Record already exists".to_string());
                }
                ErrorKind::NotNullViolation | ErrorKind::CheckViolation => {
                    return AppError::validation(db_err.message().to_string());
                }
                _ => {}
            }
        }
        AppError::Database(err)
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<FieldViolation>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Internal detail stays in the logs
        let message = if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let errors = match &self {
            AppError::Validation { violations, .. } => violations.clone(),
            _ => Vec::new(),
        };

        (
            status,
            Json(ErrorBody {
                error: self.code(),
                message,
                errors,
            }),
        )
            .into_response()
    }
}
