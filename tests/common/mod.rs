//! Test utilities and common setup.

use axum::{
    Router,
    body::Body,
    http::{Method, Request, Response, header},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use taskhub::api::{self, AppState};
use taskhub::auth::{AuthService, TokenCodec};
use taskhub::db::Database;
use taskhub::todo::TodoRepository;
use taskhub::user::UserRepository;

/// Signing secret used by every test app.
pub const TEST_SECRET: &str = "test-secret-for-integration-tests-minimum-32-chars";

/// Create a test application backed by an in-memory database.
pub async fn test_app() -> Router {
    let db = Database::in_memory().await.unwrap();

    let users = UserRepository::new(db.pool().clone());
    let todos = TodoRepository::new(db.pool().clone());
    let auth = AuthService::new(users, TokenCodec::new(TEST_SECRET));

    let state = AppState::new(auth, todos);
    api::create_router(state)
}

/// Send a JSON request and return the raw response.
pub async fn send_json(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Value,
) -> Response<Body> {
    let mut builder = Request::builder()
        .uri(uri)
        .method(method)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header("x-auth", token);
    }

    app.clone()
        .oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

/// Send a bodyless request and return the raw response.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder().uri(uri).method(method);
    if let Some(token) = token {
        builder = builder.header("x-auth", token);
    }

    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Read a response body as raw bytes.
pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap()
        .to_vec()
}

/// Register a user and return their auth token.
pub async fn register_user(app: &Router, email: &str, password: &str) -> String {
    let response = send_json(
        app,
        Method::POST,
        "/users",
        None,
        json!({"email": email, "password": password}),
    )
    .await;

    assert!(
        response.status().is_success(),
        "registration failed: {}",
        response.status()
    );

    response
        .headers()
        .get("x-auth")
        .expect("registration response carries x-auth header")
        .to_str()
        .unwrap()
        .to_string()
}
