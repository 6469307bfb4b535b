//! Authentication configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Authentication configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Signing secret for bearer tokens. Supports `env:VAR_NAME` syntax to
    /// read the value from the environment at startup. Rotating the secret
    /// invalidates all previously issued tokens.
    pub token_secret: Option<String>,
}

impl AuthConfig {
    /// Resolve the token secret, expanding `env:VAR_NAME` syntax.
    /// Returns the resolved secret or None if not configured.
    pub fn resolve_token_secret(&self) -> Result<Option<String>, ConfigValidationError> {
        match &self.token_secret {
            None => Ok(None),
            Some(value) => {
                if let Some(var_name) = value.strip_prefix("env:") {
                    match std::env::var(var_name) {
                        Ok(secret) if !secret.is_empty() => Ok(Some(secret)),
                        Ok(_) => Err(ConfigValidationError::EnvVarEmpty(var_name.to_string())),
                        Err(_) => Err(ConfigValidationError::EnvVarNotFound(var_name.to_string())),
                    }
                } else {
                    Ok(Some(value.clone()))
                }
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let secret = self.resolve_token_secret()?;

        match secret {
            None => Err(ConfigValidationError::MissingTokenSecret),
            Some(secret) if secret.len() < 32 => Err(ConfigValidationError::TokenSecretTooShort),
            Some(_) => Ok(()),
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    /// A token secret must be configured before serving.
    #[error("auth.token_secret is not configured")]
    MissingTokenSecret,

    /// Secrets shorter than 32 characters are rejected.
    #[error("auth.token_secret must be at least 32 characters")]
    TokenSecretTooShort,

    /// `env:VAR_NAME` referenced a variable that is not set.
    #[error("environment variable not found: {0}")]
    EnvVarNotFound(String),

    /// `env:VAR_NAME` referenced a variable that is empty.
    #[error("environment variable is empty: {0}")]
    EnvVarEmpty(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_missing_secret() {
        let config = AuthConfig::default();
        assert_eq!(
            config.validate().unwrap_err(),
            ConfigValidationError::MissingTokenSecret
        );
    }

    #[test]
    fn test_validate_short_secret() {
        let config = AuthConfig {
            token_secret: Some("too-short".to_string()),
        };
        assert_eq!(
            config.validate().unwrap_err(),
            ConfigValidationError::TokenSecretTooShort
        );
    }

    #[test]
    fn test_validate_good_secret() {
        let config = AuthConfig {
            token_secret: Some("a-perfectly-reasonable-signing-secret-123".to_string()),
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_resolve_env_secret() {
        // SAFETY: test-local variable name, no concurrent reader depends on it.
        unsafe { std::env::set_var("TASKHUB_TEST_SECRET_RESOLVE", "from-the-environment") };

        let config = AuthConfig {
            token_secret: Some("env:TASKHUB_TEST_SECRET_RESOLVE".to_string()),
        };
        assert_eq!(
            config.resolve_token_secret().unwrap().as_deref(),
            Some("from-the-environment")
        );
    }

    #[test]
    fn test_resolve_env_secret_missing_var() {
        let config = AuthConfig {
            token_secret: Some("env:TASKHUB_TEST_SECRET_UNSET".to_string()),
        };
        assert_eq!(
            config.resolve_token_secret().unwrap_err(),
            ConfigValidationError::EnvVarNotFound("TASKHUB_TEST_SECRET_UNSET".to_string())
        );
    }
}
