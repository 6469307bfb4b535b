//! Session management: login, logout, registration, and token resolution.

use anyhow::{Context, Result, bail};
use tracing::{info, instrument};

use crate::user::{User, UserRepository};

use super::error::AuthError;
use super::password;
use super::token::{PURPOSE_AUTH, TokenCodec};

/// Orchestrates credentials and bearer tokens over the user store.
///
/// Every authorization failure collapses to [`AuthError::Unauthorized`];
/// store faults stay separate so infrastructure trouble is never reported as
/// bad credentials.
#[derive(Clone)]
pub struct AuthService {
    repo: UserRepository,
    codec: TokenCodec,
}

impl AuthService {
    /// Create a new auth service.
    pub fn new(repo: UserRepository, codec: TokenCodec) -> Self {
        Self { repo, codec }
    }

    /// Register a new user and log them in.
    ///
    /// Validates the email format and password length, hashes the password,
    /// creates the record, then immediately mints and stores an auth token.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn register(&self, email: &str, password: &str) -> Result<(User, String)> {
        if !is_valid_email(email) {
            bail!("invalid email format");
        }
        if password.len() < 6 {
            bail!("password must be at least 6 characters");
        }

        let password_hash = password::hash(password)?;
        let user = self.repo.create(email, &password_hash).await?;
        let token = self.issue_and_store(&user.id).await?;

        info!(user_id = %user.id, "registered new user");

        Ok((user, token))
    }

    /// Log a user in with email and password.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), AuthError> {
        let user = self
            .verify_password(email, password)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let token = self.issue_and_store(&user.id).await?;

        info!(user_id = %user.id, "user logged in");

        Ok((user, token))
    }

    /// Resolve a presented token to its user.
    ///
    /// The codec check proves the token was minted here; the store membership
    /// check proves it has not been revoked since.
    #[instrument(skip(self, token))]
    pub async fn resolve(&self, token: &str) -> Result<User, AuthError> {
        let claims = self.codec.verify(token).ok_or(AuthError::Unauthorized)?;

        self.repo
            .find_by_credential(&claims.sub, PURPOSE_AUTH, token)
            .await?
            .ok_or(AuthError::Unauthorized)
    }

    /// Revoke a token by removing it from the user's active set.
    ///
    /// A token that is no longer listed is a hard failure, not a no-op.
    #[instrument(skip(self, token))]
    pub async fn logout(&self, user_id: &str, token: &str) -> Result<()> {
        self.repo.remove_token(user_id, token).await?;

        info!(user_id = %user_id, "user logged out");

        Ok(())
    }

    /// Verify email/password credentials.
    ///
    /// Returns `None` for unknown email and for wrong password alike; the
    /// caller-visible shape never reveals which.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn verify_password(&self, email: &str, password: &str) -> Result<Option<User>> {
        let Some(user) = self.repo.get_by_email(email).await? else {
            return Ok(None);
        };

        if password::verify(password, &user.password_hash) {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    async fn issue_and_store(&self, user_id: &str) -> Result<String> {
        let token = self
            .codec
            .issue(user_id, PURPOSE_AUTH)
            .context("signing auth token")?;
        self.repo.append_token(user_id, PURPOSE_AUTH, &token).await?;
        Ok(token)
    }
}

/// Basic email validation.
fn is_valid_email(email: &str) -> bool {
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return false;
    }
    !parts[0].is_empty() && parts[1].contains('.')
}
