//! HTTP API module.
//!
//! Route wiring, request handlers, and the error-to-response mapping.

mod error;
mod handlers;
mod routes;
mod state;

pub use error::{ApiError, ApiResult, ErrorResponse};
pub use routes::create_router;
pub use state::AppState;
