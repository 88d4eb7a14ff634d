//! Configuration settings structures for users-service
//!
//! This module defines all configuration structures that can be loaded from
//! TOML files and environment variables.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::environment::Environment;
use crate::config::error::ConfigError;
use crate::logger::LoggerConfig;

/// Signing key used when `JWT_SECRET` is not provided. Only acceptable outside production.
pub const FALLBACK_JWT_SECRET: &str = "test-secret-very-long-and-secure";

/// SQLite path that selects a private, process-local database.
pub const IN_MEMORY_DATABASE: &str = ":memory:";

const DEFAULT_ADMIN_PASSWORD: &str = "adminpass";

// ============================================================================
// Default value functions
// ============================================================================

fn default_app_name() -> String {
    "users-service".to_string()
}

fn default_app_version() -> String {
    crate::pkg_version().to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

fn default_database_path() -> String {
    IN_MEMORY_DATABASE.to_string()
}

fn default_max_connections() -> u32 {
    1
}

fn default_connection_timeout() -> u64 {
    30
}

fn default_jwt_secret() -> String {
    FALLBACK_JWT_SECRET.to_string()
}

fn default_expiration_hours() -> i64 {
    24
}

fn default_admin_email() -> String {
    "admin@example.com".to_string()
}

fn default_admin_username() -> String {
    "admin".to_string()
}

fn default_admin_password() -> String {
    DEFAULT_ADMIN_PASSWORD.to_string()
}

fn default_seed_timeout() -> u64 {
    30
}

// ============================================================================
// Root settings
// ============================================================================

/// Complete service configuration, built once in `main`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub application: ApplicationConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub jwt: JwtConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub logger: LoggerConfig,
}

impl Settings {
    /// Validates every section; `environment` tightens the rules for production.
    pub fn validate(&self, environment: Environment) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.database.validate()?;
        self.jwt.validate()?;
        self.admin.validate()?;
        self.logger
            .validate()
            .map_err(|e| ConfigError::validation("logger", e.to_string()))?;

        if environment.is_production() {
            if self.jwt.uses_fallback_secret() {
                return Err(ConfigError::validation(
                    "jwt.secret",
                    "JWT_SECRET must be set explicitly in production",
                ));
            }
            if self.jwt.is_weak_secret() {
                return Err(ConfigError::validation(
                    "jwt.secret",
                    "JWT secret must be at least 32 characters in production",
                ));
            }
            if self.admin.password == DEFAULT_ADMIN_PASSWORD {
                return Err(ConfigError::validation(
                    "admin.password",
                    "the default admin password cannot be used in production",
                ));
            }
        }

        Ok(())
    }
}

// ============================================================================
// Application Configuration
// ============================================================================

/// Application basic information configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    #[serde(default = "default_app_name")]
    pub name: String,

    #[serde(default = "default_app_version")]
    pub version: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
        }
    }
}

// ============================================================================
// Server Configuration
// ============================================================================

/// Axum HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

impl ServerConfig {
    /// Get the full server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::validation("server.host", "host cannot be empty"));
        }
        if self.port == 0 {
            return Err(ConfigError::validation("server.port", "port must be between 1 and 65535"));
        }
        if self.request_timeout == 0 {
            return Err(ConfigError::validation(
                "server.request_timeout",
                "request timeout must be positive",
            ));
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout: default_request_timeout(),
        }
    }
}

// ============================================================================
// Database Configuration
// ============================================================================

/// SQLite database configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database file path, or `:memory:` for an ephemeral database
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Maximum number of connections in the pool (ignored for `:memory:`)
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Connection acquisition timeout in seconds
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout: u64,
}

impl DatabaseConfig {
    pub fn is_in_memory(&self) -> bool {
        let path = self.path.trim();
        path == IN_MEMORY_DATABASE || path.contains("mode=memory")
    }

    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.path.trim().is_empty() {
            return Err(ConfigError::validation("database.path", "database path cannot be empty"));
        }
        if self.max_connections == 0 {
            return Err(ConfigError::validation(
                "database.max_connections",
                "at least one connection is required",
            ));
        }
        if self.connection_timeout == 0 {
            return Err(ConfigError::validation(
                "database.connection_timeout",
                "connection timeout must be positive",
            ));
        }
        Ok(())
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
            connection_timeout: default_connection_timeout(),
        }
    }
}

// ============================================================================
// JWT Configuration
// ============================================================================

/// JWT authentication configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret key for signing JWT tokens
    #[serde(default = "default_jwt_secret")]
    pub secret: String,

    /// Token lifetime in hours
    #[serde(default = "default_expiration_hours")]
    pub expiration_hours: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: default_jwt_secret(),
            expiration_hours: default_expiration_hours(),
        }
    }
}

/// Upper bound on token lifetime (one year).
pub const MAX_EXPIRATION_HOURS: i64 = 24 * 365;

impl JwtConfig {
    pub fn uses_fallback_secret(&self) -> bool {
        self.secret == FALLBACK_JWT_SECRET
    }

    /// Secrets shorter than 32 bytes are only accepted outside production.
    pub fn is_weak_secret(&self) -> bool {
        self.secret.len() < 32
    }

    /// Validates the JWT configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.is_empty() {
            return Err(ConfigError::validation("jwt.secret", "JWT secret cannot be empty"));
        }

        if !(1..=MAX_EXPIRATION_HOURS).contains(&self.expiration_hours) {
            return Err(ConfigError::validation(
                "jwt.expiration_hours",
                format!("Token expiration must be between 1 and {} hours", MAX_EXPIRATION_HOURS),
            ));
        }

        Ok(())
    }
}

// ============================================================================
// Admin Configuration
// ============================================================================

/// Identity of the administrator account guaranteed to exist after startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminConfig {
    #[serde(default = "default_admin_email")]
    pub email: String,

    #[serde(default = "default_admin_username")]
    pub username: String,

    #[serde(default = "default_admin_password")]
    pub password: String,

    /// Upper bound in seconds for the whole seeding step
    #[serde(default = "default_seed_timeout")]
    pub seed_timeout: u64,
}

impl AdminConfig {
    pub fn seed_timeout(&self) -> Duration {
        Duration::from_secs(self.seed_timeout)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.email.contains('@') {
            return Err(ConfigError::validation("admin.email", "admin email must be an email address"));
        }
        if self.username.trim().is_empty() {
            return Err(ConfigError::validation("admin.username", "admin username cannot be empty"));
        }
        if self.password.is_empty() {
            return Err(ConfigError::validation("admin.password", "admin password cannot be empty"));
        }
        if self.seed_timeout == 0 {
            return Err(ConfigError::validation(
                "admin.seed_timeout",
                "seed timeout must be positive",
            ));
        }
        Ok(())
    }
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            email: default_admin_email(),
            username: default_admin_username(),
            password: default_admin_password(),
            seed_timeout: default_seed_timeout(),
        }
    }
}
