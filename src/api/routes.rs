//! API route definitions.

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::auth::auth_middleware;

use super::handlers;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    // Tracing layer with request spans and timing
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Clone auth service for middleware
    let auth_service = state.auth.clone();

    // Protected routes (require a resolvable x-auth token)
    let protected_routes = Router::new()
        .route("/users/me", get(handlers::get_me))
        .route("/users/me/token", delete(handlers::logout))
        .route("/todos", get(handlers::list_todos).post(handlers::create_todo))
        .route(
            "/todos/{todo_id}",
            get(handlers::get_todo)
                .patch(handlers::update_todo)
                .delete(handlers::delete_todo),
        )
        .layer(middleware::from_fn_with_state(auth_service, auth_middleware))
        .with_state(state.clone());

    // Public routes (no authentication)
    let public_routes = Router::new()
        .route("/health", get(handlers::health))
        .route("/users", post(handlers::create_user))
        .route("/users/login", post(handlers::login))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
}
