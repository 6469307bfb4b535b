//! Application state shared across handlers.

use std::sync::Arc;

use crate::auth::AuthService;
use crate::todo::TodoRepository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Session manager for registration, login, and token resolution.
    pub auth: AuthService,
    /// Todo repository for the owner-scoped CRUD routes.
    pub todos: Arc<TodoRepository>,
}

impl AppState {
    /// Create new application state.
    pub fn new(auth: AuthService, todos: TodoRepository) -> Self {
        Self {
            auth,
            todos: Arc::new(todos),
        }
    }
}
