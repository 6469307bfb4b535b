//! Todo data models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Todo entity from database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Todo {
    pub id: String,
    pub owner_id: String,
    pub text: String,
    pub completed: bool,
    /// Millisecond timestamp, set while `completed` is true.
    pub completed_at: Option<i64>,
    pub created_at: String,
}

/// Request to create a new todo.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTodoRequest {
    pub text: String,
}

/// Request to update an existing todo.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTodoRequest {
    pub text: Option<String>,
    pub completed: Option<bool>,
}
