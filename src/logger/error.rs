//! Error types for the logger

use thiserror::Error;

/// Errors that can occur while configuring or installing the logger
#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to install global subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

impl LoggerError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
