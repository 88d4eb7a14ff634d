use axum::extract::rejection::JsonRejection;
use diesel_async::pooled_connection::PoolError;
use serde::Serialize;
use thiserror::Error;

use crate::config::error::ConfigError;
use crate::error::DatabaseErrorConverter;

/// Application-wide error type that represents all possible errors in the system.
///
/// Variants carry enough structure to render a client-facing error body
/// while keeping the underlying cause available through `source()` for logs.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found error with entity, field, and value information
    #[error("Resource not found: {entity} with {field}={value}")]
    NotFound {
        entity: String,
        field: String,
        value: String,
    },

    /// Duplicate entry error for unique constraint violations
    #[error("Duplicate entry: {entity}.{field} = '{value}' already exists")]
    Duplicate {
        entity: String,
        field: String,
        value: String,
    },

    /// Validation error with field-specific details
    #[error("Validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Several fields failed request validation at once
    #[error("Validation failed for {} field(s)", errors.len())]
    ValidationErrors { errors: Vec<ValidationFieldError> },

    /// Bad request error with descriptive message
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// Unauthorized access error with authentication message
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// Forbidden access error with authorization message
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    /// Database operation error with operation context
    #[error("Database operation failed: {operation}")]
    Database {
        operation: String,
        #[source]
        source: anyhow::Error,
    },

    /// Configuration error with key information
    #[error("Configuration error: {key}")]
    Configuration {
        key: String,
        #[source]
        source: anyhow::Error,
    },

    /// Connection pool error
    #[error("Connection pool error")]
    ConnectionPool {
        #[source]
        source: anyhow::Error,
    },

    /// Internal error for unexpected failures
    #[error("Internal error")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

/// A single field failure reported by request validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFieldError {
    pub field: String,
    pub message: String,
}

impl AppError {
    pub fn not_found(entity: &str, field: &str, value: impl ToString) -> Self {
        AppError::NotFound {
            entity: entity.to_string(),
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    pub fn duplicate(entity: &str, field: &str, value: impl ToString) -> Self {
        AppError::Duplicate {
            entity: entity.to_string(),
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        AppError::Unauthorized {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        AppError::Forbidden {
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest {
            message: message.into(),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

impl From<diesel::result::Error> for AppError {
    fn from(error: diesel::result::Error) -> Self {
        DatabaseErrorConverter::convert_diesel_error(error, "database operation")
    }
}

impl From<PoolError> for AppError {
    fn from(error: PoolError) -> Self {
        AppError::ConnectionPool {
            source: anyhow::Error::from(error),
        }
    }
}

impl From<bb8::RunError<PoolError>> for AppError {
    fn from(error: bb8::RunError<PoolError>) -> Self {
        let source = match error {
            bb8::RunError::User(inner) => anyhow::Error::from(inner),
            bb8::RunError::TimedOut => anyhow::anyhow!("timed out waiting for a connection"),
        };
        AppError::ConnectionPool { source }
    }
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        let key = match &error {
            ConfigError::ValidationError { field, .. } => field.clone(),
            _ => "settings".to_string(),
        };
        AppError::Configuration {
            key,
            source: anyhow::Error::from(error),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<ValidationFieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| ValidationFieldError {
                    field: field.to_string(),
                    message: err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is invalid", field)),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        AppError::ValidationErrors { errors: fields }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest {
            message: rejection.body_text(),
        }
    }
}

impl From<argon2::password_hash::Error> for AppError {
    fn from(error: argon2::password_hash::Error) -> Self {
        AppError::Internal {
            source: anyhow::anyhow!("password hashing failed: {}", error),
        }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;
