//! Signed bearer token codec.
//!
//! Tokens are HS256 JWTs whose claims carry only the subject user id and a
//! purpose tag. With no timestamp or nonce in the payload, encoding is pure:
//! the same `(user id, purpose)` pair always produces the same token string.
//! Revocation therefore works by removing the exact string from the store,
//! not by expiring an issuance epoch.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Token class for login sessions. The only purpose in use; the tag exists so
/// future token classes (password reset, API keys) can share the codec.
pub const PURPOSE_AUTH: &str = "auth";

/// Claims carried by a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject user id.
    pub sub: String,
    /// Token class tag.
    pub purpose: String,
}

/// Signs and verifies bearer tokens with a process-wide secret.
///
/// The secret is injected at construction; rotating it invalidates every
/// previously issued token and forces re-login.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenCodec {
    /// Create a codec from a signing secret.
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issue a signed token binding a user id and a purpose tag.
    pub fn issue(&self, user_id: &str, purpose: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = TokenClaims {
            sub: user_id.to_string(),
            purpose: purpose.to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
    }

    /// Verify a token and return its claims.
    ///
    /// Any signature mismatch, malformed structure, or decode failure yields
    /// `None`; the payload is never trusted before the signature checks out.
    pub fn verify(&self, token: &str) -> Option<TokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Tokens carry no expiry claim.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        match decode::<TokenClaims>(token, &self.decoding_key, &validation) {
            Ok(data) => Some(data.claims),
            Err(err) => {
                debug!("token verification failed: {}", err);
                None
            }
        }
    }
}
