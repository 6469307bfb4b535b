//! Todo module.
//!
//! Owner-scoped CRUD over todo items. No interesting invariants beyond
//! ownership; the auth layer decides who the owner is.

mod models;
mod repository;

pub use models::{CreateTodoRequest, Todo, UpdateTodoRequest};
pub use repository::TodoRepository;
