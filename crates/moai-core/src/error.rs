//! Error types for moai-core

use thiserror::Error;

/// Result type alias using moai-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for Moai
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid configuration format
    #[error("Invalid configuration format: {message}")]
    InvalidConfig { message: String },

    /// Environment variable with an unparsable value
    #[error("Invalid value for {var}: {value:?} ({reason})")]
    InvalidEnv {
        var: String,
        value: String,
        reason: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an invalid environment value error
    pub fn invalid_env(
        var: impl Into<String>,
        value: impl Into<String>,
        reason: impl ToString,
    ) -> Self {
        Self::InvalidEnv {
            var: var.into(),
            value: value.into(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_env_display() {
        let err = Error::invalid_env("MOAI_RETRY_MAX_RETRIES", "lots", "invalid digit found in string");
        let display = err.to_string();
        assert!(display.contains("MOAI_RETRY_MAX_RETRIES"));
        assert!(display.contains("\"lots\""));
        assert!(display.contains("invalid digit"));
    }

    #[test]
    fn test_config_not_found_display() {
        let err = Error::config_not_found("/tmp/missing.yaml");
        assert_eq!(
            err.to_string(),
            "Configuration file not found: /tmp/missing.yaml"
        );
    }
}
