//! Unified API error handling with structured responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// API error type with structured responses.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            // Conflicts surface as 400 on this API; clients key off `code`,
            // not the status line.
            Self::Conflict(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::Conflict(_) => "CONFLICT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Categorize an anyhow error into the appropriate ApiError variant.
    /// This uses pattern matching on error messages to determine the category.
    ///
    /// Patterns recognized:
    /// - "not found" -> NotFound
    /// - "already in use" -> Conflict
    /// - "invalid" / "must be" / "cannot" -> BadRequest
    /// - Default -> Internal
    pub fn from_anyhow(err: anyhow::Error) -> Self {
        let msg = err.to_string();
        let msg_lower = msg.to_lowercase();

        if msg_lower.contains("not found") {
            ApiError::NotFound(msg)
        } else if msg_lower.contains("already in use") {
            ApiError::Conflict(msg)
        } else if msg_lower.contains("invalid")
            || msg_lower.contains("must be")
            || msg_lower.contains("cannot")
        {
            ApiError::BadRequest(msg)
        } else {
            ApiError::Internal(msg)
        }
    }
}

/// Structured error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();
        let message = self.to_string();

        match &self {
            ApiError::Internal(msg) => {
                error!(error_code = code, message = %msg, "API error");
            }
            _ => {
                tracing::debug!(error_code = code, message = %message, "Client error");
            }
        }

        let body = ErrorResponse {
            error: message,
            code,
        };

        (status, Json(body)).into_response()
    }
}

/// Convert anyhow errors to API errors using the centralized categorization logic.
impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::from_anyhow(err)
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categorization_not_found() {
        let err = anyhow::anyhow!("todo not found: todo_abc123");
        let api_err = ApiError::from_anyhow(err);
        assert!(matches!(api_err, ApiError::NotFound(_)));
    }

    #[test]
    fn test_error_categorization_conflict() {
        let err = anyhow::anyhow!("email already in use");
        let api_err = ApiError::from_anyhow(err);
        assert!(matches!(api_err, ApiError::Conflict(_)));
    }

    #[test]
    fn test_error_categorization_bad_request_invalid() {
        let err = anyhow::anyhow!("invalid email format");
        let api_err = ApiError::from_anyhow(err);
        assert!(matches!(api_err, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_error_categorization_bad_request_must_be() {
        let err = anyhow::anyhow!("password must be at least 6 characters");
        let api_err = ApiError::from_anyhow(err);
        assert!(matches!(api_err, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_error_categorization_bad_request_cannot() {
        let err = anyhow::anyhow!("todo text cannot be empty");
        let api_err = ApiError::from_anyhow(err);
        assert!(matches!(api_err, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_error_categorization_internal_default() {
        let err = anyhow::anyhow!("Something went wrong");
        let api_err = ApiError::from_anyhow(err);
        assert!(matches!(api_err, ApiError::Internal(_)));
    }

    #[test]
    fn test_error_response_status_codes() {
        assert_eq!(ApiError::not_found("").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::bad_request("").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::conflict("").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::internal("").status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
