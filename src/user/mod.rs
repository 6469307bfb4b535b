//! User management module.
//!
//! Provides the user record and the credential store operations the
//! authentication layer is built on.

mod models;
mod repository;

pub use models::{User, UserInfo};
pub use repository::UserRepository;
