//! Authentication errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Any authorization failure: missing header, bad credentials, malformed
    /// or tampered token, revoked token, unknown user. Deliberately a single
    /// undifferentiated variant so no cause leaks to the caller.
    #[error("unauthorized")]
    Unauthorized,

    /// A store fault is not an authorization outcome and must never be
    /// mistaken for invalid credentials.
    #[error("auth store error: {0}")]
    Store(#[from] anyhow::Error),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            // Uniform status, empty body, regardless of root cause.
            AuthError::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            AuthError::Store(err) => {
                error!("auth store failure: {:?}", err);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}
