//! Configuration error types.

use thiserror::Error;

/// Errors raised while loading or validating ingress configuration.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Invalid configuration value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ConfigurationError {
    /// Create an InvalidValue error with field context.
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
