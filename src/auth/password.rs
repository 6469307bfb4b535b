//! Password hashing.
//!
//! bcrypt output is a self-describing string (parameters + per-hash random
//! salt + digest), safe to store directly.

use anyhow::{Context, Result};

/// Hash a password using bcrypt.
pub fn hash(password: &str) -> Result<String> {
    // Use a lower cost factor for development speed
    let cost = if cfg!(debug_assertions) { 4 } else { 10 };
    bcrypt::hash(password, cost).context("Failed to hash password")
}

/// Verify a password against a bcrypt hash.
///
/// Returns false for a wrong password and for an unparseable hash; malformed
/// input is never an error.
pub fn verify(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}
