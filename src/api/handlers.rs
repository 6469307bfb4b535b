//! API request handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{AppendHeaders, IntoResponse},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::auth::{AUTH_HEADER, AuthError, CurrentUser};
use crate::todo::{CreateTodoRequest, Todo, UpdateTodoRequest};
use crate::user::UserInfo;

use super::error::{ApiError, ApiResult};
use super::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============================================================================
// Authentication Handlers
// ============================================================================

/// Credentials for registration and login.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// Register a new user.
///
/// Registration implies login: the response already carries a usable token
/// in the `x-auth` header. The body never includes the password hash.
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> ApiResult<impl IntoResponse> {
    let (user, token) = state.auth.register(&request.email, &request.password).await?;

    Ok((
        StatusCode::CREATED,
        AppendHeaders([(AUTH_HEADER, token)]),
        Json(UserInfo::from(user)),
    ))
}

/// Log in with email and password.
///
/// Failures are uniform: wrong password and unknown email produce the same
/// status, the same (empty) body, and no `x-auth` header.
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, AuthError> {
    let (user, token) = state.auth.login(&request.email, &request.password).await?;

    Ok((
        AppendHeaders([(AUTH_HEADER, token)]),
        Json(UserInfo::from(user)),
    ))
}

/// Get the calling user's own profile.
pub async fn get_me(user: CurrentUser) -> Json<UserInfo> {
    Json(UserInfo::from(user.user().clone()))
}

/// Log out by revoking the token this request authenticated with.
#[instrument(skip(state, user), fields(user_id = %user.id()))]
pub async fn logout(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<StatusCode> {
    state.auth.logout(user.id(), user.token()).await?;
    Ok(StatusCode::OK)
}

// ============================================================================
// Todo Handlers
// ============================================================================

/// List response wrapper.
#[derive(Debug, Serialize)]
pub struct TodoListResponse {
    pub todos: Vec<Todo>,
}

/// Single-todo response wrapper.
#[derive(Debug, Serialize)]
pub struct TodoResponse {
    pub todo: Todo,
}

/// Create a todo owned by the caller.
#[instrument(skip(state, user, request), fields(user_id = %user.id()))]
pub async fn create_todo(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(request): Json<CreateTodoRequest>,
) -> ApiResult<impl IntoResponse> {
    let todo = state.todos.create(user.id(), &request.text).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

/// List the caller's todos.
#[instrument(skip(state, user), fields(user_id = %user.id()))]
pub async fn list_todos(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Json<TodoListResponse>> {
    let todos = state.todos.list(user.id()).await?;
    Ok(Json(TodoListResponse { todos }))
}

/// Get one of the caller's todos.
#[instrument(skip(state, user), fields(user_id = %user.id()))]
pub async fn get_todo(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(todo_id): Path<String>,
) -> ApiResult<Json<TodoResponse>> {
    let todo = state
        .todos
        .get(user.id(), &todo_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("todo not found: {todo_id}")))?;
    Ok(Json(TodoResponse { todo }))
}

/// Update one of the caller's todos.
#[instrument(skip(state, user, request), fields(user_id = %user.id()))]
pub async fn update_todo(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(todo_id): Path<String>,
    Json(request): Json<UpdateTodoRequest>,
) -> ApiResult<Json<TodoResponse>> {
    let todo = state.todos.update(user.id(), &todo_id, request).await?;
    Ok(Json(TodoResponse { todo }))
}

/// Delete one of the caller's todos, returning the deleted record.
#[instrument(skip(state, user), fields(user_id = %user.id()))]
pub async fn delete_todo(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(todo_id): Path<String>,
) -> ApiResult<Json<TodoResponse>> {
    let todo = state.todos.delete(user.id(), &todo_id).await?;
    Ok(Json(TodoResponse { todo }))
}
