//! Errors raised while assembling `Settings`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {0}")]
    FileNotFound(String),

    /// A source was readable but a value did not fit its field.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    #[error("invalid {field}: {message}")]
    ValidationError { field: String, message: String },

    /// `APP_ENV` held something other than development, test or production.
    #[error("invalid environment: {0}")]
    InvalidEnvironment(String),

    #[error(transparent)]
    Source(#[from] config::ConfigError),
}

impl ConfigError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn file_not_found(path: impl Into<String>) -> Self {
        ConfigError::FileNotFound(path.into())
    }
}
