//! Todo repository for database operations.
//!
//! Every operation is keyed by owner id: a todo belonging to another user is
//! indistinguishable from one that does not exist.

use anyhow::{Context, Result, bail};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, instrument};

use super::models::{Todo, UpdateTodoRequest};

/// Repository for todo database operations.
#[derive(Debug, Clone)]
pub struct TodoRepository {
    pool: SqlitePool,
}

impl TodoRepository {
    /// Create a new todo repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Generate a new todo ID.
    fn generate_id() -> String {
        format!("todo_{}", nanoid::nanoid!(12))
    }

    /// Create a new todo for an owner.
    #[instrument(skip(self, text))]
    pub async fn create(&self, owner_id: &str, text: &str) -> Result<Todo> {
        let text = text.trim();
        if text.is_empty() {
            bail!("todo text cannot be empty");
        }

        let id = Self::generate_id();

        debug!("Creating todo {} for {}", id, owner_id);

        sqlx::query(
            r#"
            INSERT INTO todos (id, owner_id, text)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(owner_id)
        .bind(text)
        .execute(&self.pool)
        .await
        .context("Failed to insert todo")?;

        self.get(owner_id, &id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Todo not found after creation"))
    }

    /// Get one of the owner's todos by ID.
    #[instrument(skip(self))]
    pub async fn get(&self, owner_id: &str, id: &str) -> Result<Option<Todo>> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, owner_id, text, completed, completed_at, created_at
            FROM todos
            WHERE id = ? AND owner_id = ?
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch todo")?;

        Ok(todo)
    }

    /// List all of the owner's todos.
    #[instrument(skip(self))]
    pub async fn list(&self, owner_id: &str) -> Result<Vec<Todo>> {
        let todos = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, owner_id, text, completed, completed_at, created_at
            FROM todos
            WHERE owner_id = ?
            ORDER BY created_at, id
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .context("Failed to list todos")?;

        Ok(todos)
    }

    /// Update one of the owner's todos.
    ///
    /// Completing a todo stamps `completed_at`; un-completing clears it.
    #[instrument(skip(self, request))]
    pub async fn update(&self, owner_id: &str, id: &str, request: UpdateTodoRequest) -> Result<Todo> {
        let existing = self
            .get(owner_id, id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("todo not found: {}", id))?;

        if let Some(text) = &request.text {
            if text.trim().is_empty() {
                bail!("todo text cannot be empty");
            }
        }

        let text = request.text.unwrap_or(existing.text);
        let (completed, completed_at) = match request.completed {
            Some(true) => (true, Some(Utc::now().timestamp_millis())),
            Some(false) => (false, None),
            None => (existing.completed, existing.completed_at),
        };

        sqlx::query(
            r#"
            UPDATE todos
            SET text = ?, completed = ?, completed_at = ?
            WHERE id = ? AND owner_id = ?
            "#,
        )
        .bind(text.trim())
        .bind(completed)
        .bind(completed_at)
        .bind(id)
        .bind(owner_id)
        .execute(&self.pool)
        .await
        .context("Failed to update todo")?;

        self.get(owner_id, id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Todo not found after update"))
    }

    /// Delete one of the owner's todos, returning the deleted record.
    #[instrument(skip(self))]
    pub async fn delete(&self, owner_id: &str, id: &str) -> Result<Todo> {
        let existing = self
            .get(owner_id, id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("todo not found: {}", id))?;

        sqlx::query("DELETE FROM todos WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .context("Failed to delete todo")?;

        Ok(existing)
    }
}
