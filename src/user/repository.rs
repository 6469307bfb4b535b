//! User repository for database operations.
//!
//! One row in `users` per account, one row in `user_tokens` per active bearer
//! token. Token membership is what makes a token live: a structurally valid
//! token with no matching row resolves to nothing.

use anyhow::{Context, Result, bail};
use sqlx::SqlitePool;
use tracing::{debug, instrument};

use super::models::User;

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Generate a new user ID.
    fn generate_id() -> String {
        format!("usr_{}", nanoid::nanoid!(12))
    }

    /// Create a new user with an already-hashed password.
    ///
    /// Email uniqueness is enforced by the store at write time; a violating
    /// insert fails here rather than in a racy pre-check.
    #[instrument(skip(self, password_hash))]
    pub async fn create(&self, email: &str, password_hash: &str) -> Result<User> {
        let id = Self::generate_id();

        debug!("Creating user: {} ({})", email, id);

        let result = sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(email)
        .bind(password_hash)
        .execute(&self.pool)
        .await;

        if let Err(sqlx::Error::Database(db_err)) = &result {
            if db_err.is_unique_violation() {
                bail!("email already in use");
            }
        }
        result.context("Failed to insert user")?;

        self.get(&id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("User not found after creation"))
    }

    /// Get a user by ID.
    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, created_at, updated_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch user")?;

        Ok(user)
    }

    /// Get a user by email.
    #[instrument(skip(self))]
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, created_at, updated_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch user by email")?;

        Ok(user)
    }

    /// Look up a user by an exact credential triple.
    ///
    /// Succeeds only while the token row is present; this membership check is
    /// what revokes a token on logout.
    #[instrument(skip(self, token))]
    pub async fn find_by_credential(
        &self,
        user_id: &str,
        purpose: &str,
        token: &str,
    ) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.email, u.password_hash, u.created_at, u.updated_at
            FROM users u
            JOIN user_tokens t ON t.user_id = u.id
            WHERE u.id = ? AND t.purpose = ? AND t.token = ?
            "#,
        )
        .bind(user_id)
        .bind(purpose)
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch user by credential")?;

        Ok(user)
    }

    /// Add a token to a user's active set.
    ///
    /// Add-to-set semantics: inserting an identical triple again is a no-op.
    #[instrument(skip(self, token))]
    pub async fn append_token(&self, user_id: &str, purpose: &str, token: &str) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO user_tokens (user_id, purpose, token)
            VALUES (?, ?, ?)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(purpose)
        .bind(token)
        .execute(&self.pool)
        .await;

        if let Err(sqlx::Error::Database(db_err)) = &result {
            if db_err.is_foreign_key_violation() {
                bail!("user not found: {}", user_id);
            }
        }
        result.context("Failed to append token")?;

        Ok(())
    }

    /// Remove a token from a user's active set.
    #[instrument(skip(self, token))]
    pub async fn remove_token(&self, user_id: &str, token: &str) -> Result<()> {
        let result = sqlx::query("DELETE FROM user_tokens WHERE user_id = ? AND token = ?")
            .bind(user_id)
            .bind(token)
            .execute(&self.pool)
            .await
            .context("Failed to remove token")?;

        if result.rows_affected() == 0 {
            bail!("token not found for user: {}", user_id);
        }

        Ok(())
    }
}
