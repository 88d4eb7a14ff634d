//! Configuration management module for users-service
//!
//! Settings are assembled once at process entry and passed down explicitly.
//!
//! # Configuration Priority (lowest to highest)
//! 1. Built-in defaults
//! 2. Optional TOML file (`--config` or `USERS_CONFIG_FILE`)
//! 3. `USERS_*` environment variables (`USERS_SERVER__PORT` -> `server.port`)
//! 4. Legacy variables `DB_PATH`, `JWT_SECRET` and `PORT`

pub mod environment;
pub mod error;
pub mod loader;
pub mod settings;

pub use environment::Environment;
pub use loader::ConfigLoader;
pub use settings::{
    AdminConfig, ApplicationConfig, DatabaseConfig, FALLBACK_JWT_SECRET, JwtConfig, ServerConfig,
    Settings,
};
