//! Authentication middleware.

use axum::{
    extract::{FromRequestParts, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::user::User;

use super::error::AuthError;
use super::service::AuthService;

/// Request header carrying the raw bearer token.
pub const AUTH_HEADER: &str = "x-auth";

/// Authenticated user extracted from request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    user: User,
    token: String,
}

impl CurrentUser {
    /// Get the user ID.
    pub fn id(&self) -> &str {
        &self.user.id
    }

    /// Get the resolved user record.
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Get the token string this request authenticated with.
    pub fn token(&self) -> &str {
        &self.token
    }
}

/// Extract authentication from request.
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AuthError::Unauthorized)
    }
}

/// Authentication middleware.
///
/// Reads the raw token from the `x-auth` header, resolves it to a user, and
/// injects [`CurrentUser`] into request extensions. A missing header is
/// rejected before the session layer is consulted; any resolution failure
/// short-circuits with the same uniform response. The read path never mutates
/// store state.
pub async fn auth_middleware(
    State(auth): State<AuthService>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AuthError> {
    let token = req
        .headers()
        .get(AUTH_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned)
        .ok_or(AuthError::Unauthorized)?;

    let user = auth.resolve(&token).await?;

    req.extensions_mut().insert(CurrentUser { user, token });

    Ok(next.run(req).await)
}
