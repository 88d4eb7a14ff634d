//! Configuration loader for users-service
//!
//! `ConfigLoader` captures the process environment once and layers it over
//! the built-in defaults and an optional TOML file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};

use crate::config::error::ConfigError;
use crate::config::settings::Settings;

/// Environment variable naming a configuration file
pub const CONFIG_FILE_ENV: &str = "USERS_CONFIG_FILE";

/// Environment variable prefix for nested configuration overrides
const ENV_PREFIX: &str = "USERS";

/// Separator for nested configuration keys in environment variables
const ENV_SEPARATOR: &str = "__";

/// Flat variables kept for compatibility with existing deployments,
/// mapped onto their settings keys. These win over everything else.
const LEGACY_VARS: &[(&str, &str)] = &[
    ("DB_PATH", "database.path"),
    ("JWT_SECRET", "jwt.secret"),
    ("PORT", "server.port"),
];

/// Configuration loader that handles layered configuration loading
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_file: Option<PathBuf>,
    vars: HashMap<String, String>,
}

impl ConfigLoader {
    /// Creates a loader over the current process environment.
    ///
    /// `config_file` takes precedence over `USERS_CONFIG_FILE`.
    pub fn new(config_file: Option<PathBuf>) -> Self {
        Self::from_vars(config_file, std::env::vars())
    }

    /// Creates a loader over an explicit set of variables instead of the
    /// process environment.
    pub fn from_vars<I, K, V>(config_file: Option<PathBuf>, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let config_file = config_file.or_else(|| {
            vars.get(CONFIG_FILE_ENV)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
        });
        Self { config_file, vars }
    }

    /// The configuration file that will be read, if any
    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    /// Load configuration from all sources
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file is missing or malformed,
    /// or a value cannot be converted to its field type.
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let config = self.build_config()?;
        config.try_deserialize().map_err(|e| {
            ConfigError::ParseError(format!("Failed to deserialize configuration: {}", e))
        })
    }

    fn build_config(&self) -> Result<Config, ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = &self.config_file {
            builder = Self::add_file_source(builder, path)?;
        }

        builder = self.add_env_source(builder);
        builder = self.add_legacy_overrides(builder)?;

        builder.build().map_err(ConfigError::from)
    }

    fn add_file_source(
        builder: ConfigBuilder<DefaultState>,
        path: &Path,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::file_not_found(path.display().to_string()));
        }
        Ok(builder.add_source(
            File::new(path.to_str().unwrap_or_default(), FileFormat::Toml).required(true),
        ))
    }

    /// `USERS_SERVER__PORT` -> `server.port`, `USERS_ADMIN__EMAIL` -> `admin.email`
    fn add_env_source(&self, builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
        builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator(ENV_SEPARATOR)
                .ignore_empty(true)
                .try_parsing(true)
                .source(Some(self.vars.clone())),
        )
    }

    fn add_legacy_overrides(
        &self,
        mut builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        for (var, key) in LEGACY_VARS {
            let value = self.vars.get(*var).filter(|v| !v.trim().is_empty()).cloned();
            builder = builder.set_override_option(*key, value)?;
        }
        Ok(builder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FALLBACK_JWT_SECRET;
    use std::fs;
    use tempfile::TempDir;

    fn load(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        ConfigLoader::from_vars(None, vars.iter().copied()).load()
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let settings = load(&[]).expect("defaults should load");
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.jwt.secret, FALLBACK_JWT_SECRET);
    }

    #[test]
    fn test_legacy_variables_override_defaults() {
        let settings = load(&[
            ("DB_PATH", "/var/lib/users/users.db"),
            ("JWT_SECRET", "another-secret-that-is-long-enough-123"),
            ("PORT", "9090"),
        ])
        .unwrap();

        assert_eq!(settings.database.path, "/var/lib/users/users.db");
        assert_eq!(settings.jwt.secret, "another-secret-that-is-long-enough-123");
        assert_eq!(settings.server.port, 9090);
    }

    #[test]
    fn test_empty_legacy_variables_are_ignored() {
        let settings = load(&[("DB_PATH", ""), ("PORT", "  ")]).unwrap();
        assert_eq!(settings.database.path, ":memory:");
        assert_eq!(settings.server.port, 8080);
    }

    #[test]
    fn test_prefixed_variables_override_nested_keys() {
        let settings = load(&[
            ("USERS_SERVER__HOST", "127.0.0.1"),
            ("USERS_ADMIN__EMAIL", "root@example.org"),
            ("USERS_LOGGER__LEVEL", "debug"),
        ])
        .unwrap();

        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.admin.email, "root@example.org");
        assert_eq!(settings.logger.level, "debug");
    }

    #[test]
    fn test_legacy_port_beats_prefixed_port() {
        let settings = load(&[("USERS_SERVER__PORT", "7000"), ("PORT", "7001")]).unwrap();
        assert_eq!(settings.server.port, 7001);
    }

    #[test]
    fn test_invalid_port_is_parse_error() {
        let err = load(&[("PORT", "not-a-port")]).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_config_file_is_layered_under_environment() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("users.toml");
        fs::write(
            &path,
            r#"
[server]
port = 3000
request_timeout = 10

[database]
path = "from-file.db"
"#,
        )
        .expect("Failed to write config file");

        let settings = ConfigLoader::from_vars(Some(path), [("DB_PATH", "from-env.db")])
            .load()
            .unwrap();

        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.server.request_timeout, 10);
        assert_eq!(settings.database.path, "from-env.db");
    }

    #[test]
    fn test_config_file_from_variable() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("users.toml");
        fs::write(&path, "[jwt]\nexpiration_hours = 2\n").unwrap();

        let loader = ConfigLoader::from_vars(None, [(CONFIG_FILE_ENV, path.to_str().unwrap())]);
        assert_eq!(loader.config_file(), Some(path.as_path()));
        assert_eq!(loader.load().unwrap().jwt.expiration_hours, 2);
    }

    #[test]
    fn test_missing_config_file() {
        let err = ConfigLoader::from_vars(
            Some(PathBuf::from("/definitely/not/here.toml")),
            Vec::<(String, String)>::new(),
        )
        .load()
        .unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }
}
