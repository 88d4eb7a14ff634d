//! Configuration types for the logger

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::Level;

use crate::logger::error::LoggerError;

fn default_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_path() -> PathBuf {
    PathBuf::from("logs/users-service.log")
}

/// Main logger configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// One of trace, debug, info, warn, error
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub console: ConsoleConfig,

    #[serde(default)]
    pub file: FileConfig,
}

impl LoggerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), LoggerError> {
        self.parse_level()?;

        if self.file.enabled && self.file.path.as_os_str().is_empty() {
            return Err(LoggerError::config(
                "File path cannot be empty when file output is enabled",
            ));
        }

        if !self.console.enabled && !self.file.enabled {
            return Err(LoggerError::config(
                "At least one output (console or file) must be enabled",
            ));
        }

        Ok(())
    }

    /// Parse the log level string into a tracing::Level
    pub fn parse_level(&self) -> Result<Level, LoggerError> {
        match self.level.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => Err(LoggerError::config(format!(
                "Invalid log level '{}'. Valid levels are: trace, debug, info, warn, error",
                self.level
            ))),
        }
    }

    /// Returns a copy with the level replaced, e.g. from `--verbose`.
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            console: ConsoleConfig::default(),
            file: FileConfig::default(),
        }
    }
}

/// Console output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// ANSI colors, only applied when stdout is a terminal
    #[serde(default = "default_true")]
    pub colored: bool,

    #[serde(default)]
    pub format: LogFormat,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            colored: true,
            format: LogFormat::Full,
        }
    }
}

/// File output configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_log_path")]
    pub path: PathBuf,

    /// Append to an existing file instead of truncating it
    #[serde(default = "default_true")]
    pub append: bool,

    #[serde(default = "LogFormat::json")]
    pub format: LogFormat,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_log_path(),
            append: true,
            format: LogFormat::Json,
        }
    }
}

/// Log format options
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Full,
    Compact,
    Json,
}

impl LogFormat {
    fn json() -> Self {
        LogFormat::Json
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Full => "full",
            LogFormat::Compact => "compact",
            LogFormat::Json => "json",
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(LogFormat::Full),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            _ => Err(LoggerError::config(format!(
                "Invalid log format '{}'. Valid formats are: full, compact, json",
                s
            ))),
        }
    }
}
