//! Centralized error handling.
//!
//! A single closed error type shared by the account gateway, the
//! authentication service and the HTTP layer. Callers branch on
//! [`AppError::kind`], never on message text.

use std::time::Duration;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// User-facing message for every failed sign-in, whatever the cause.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

/// Message returned when an email is registered twice.
pub const EMAIL_TAKEN_MESSAGE: &str = "Email already taken";

/// Classification of an [`AppError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    InvalidCredentials,
    Validation,
    Unauthorized,
    Infrastructure,
}

/// Underlying cause of an infrastructure failure.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("deadline of {0:?} exceeded")]
    Timeout(Duration),

    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("session token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// No account matches the lookup. Never leaves `authenticate` as-is.
    #[error("Account not found")]
    NotFound,

    #[error("Email already taken")]
    Conflict,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("{0}")]
    Validation(String),

    #[error("Authentication required")]
    Unauthorized,

    /// Storage, hashing, signing or scheduling failure. `op` names the
    /// chain of operations that was running, outermost first.
    #[error("{op}: {source}")]
    Infrastructure {
        op: String,
        #[source]
        source: InfraError,
    },
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    status: u16,
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

impl AppError {
    /// Get the error classification
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::NotFound => ErrorKind::NotFound,
            AppError::Conflict => ErrorKind::Conflict,
            AppError::InvalidCredentials => ErrorKind::InvalidCredentials,
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::Unauthorized => ErrorKind::Unauthorized,
            AppError::Infrastructure { .. } => ErrorKind::Infrastructure,
        }
    }

    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self.kind() {
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::InvalidCredentials => "INVALID_CREDENTIALS",
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::Infrastructure => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::NotFound | ErrorKind::InvalidCredentials | ErrorKind::Validation => {
                StatusCode::BAD_REQUEST
            }
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::Infrastructure => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            AppError::Infrastructure { .. } => "An internal error occurred".to_string(),
            _ => self.to_string(),
        }
    }

    /// Prefix the operation chain of an infrastructure error with `op`.
    ///
    /// Business outcomes pass through untouched.
    pub fn context(self, op: &str) -> Self {
        match self {
            AppError::Infrastructure { op: inner, source } => AppError::Infrastructure {
                op: format!("{}: {}", op, inner),
                source,
            },
            other => other,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let AppError::Infrastructure { op, source } = &self {
            tracing::error!(op = %op, error = %source, "request failed");
        }

        let body = ErrorResponse {
            status: status.as_u16(),
            error: ErrorBody {
                code: self.code(),
                message: self.user_message(),
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Convenience constructors
impl AppError {
    pub fn infrastructure(op: impl Into<String>, source: impl Into<InfraError>) -> Self {
        AppError::Infrastructure {
            op: op.into(),
            source: source.into(),
        }
    }

    pub fn database(op: impl Into<String>, err: sea_orm::DbErr) -> Self {
        Self::infrastructure(op, InfraError::Database(err))
    }

    pub fn timeout(op: impl Into<String>, deadline: Duration) -> Self {
        Self::infrastructure(op, InfraError::Timeout(deadline))
    }

    pub fn hash(op: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::infrastructure(op, InfraError::Hash(msg.into()))
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::infrastructure("Config.from_env", InfraError::Config(msg.into()))
    }

    pub fn internal(op: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::infrastructure(op, InfraError::Other(msg.into()))
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }
}
