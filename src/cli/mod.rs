//! CLI module for users-service
//!
//! Argument parsing, configuration loading with CLI overrides, and the
//! `serve` / `migrate` command handlers.

pub mod handlers;
pub mod parser;
pub mod validation;

pub use parser::{Cli, Commands};

use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, settings::Settings};
use handlers::{MigrateCommandHandler, ServeCommandHandler};

/// Loads layered settings and applies the CLI flags on top of them.
///
/// # Errors
/// Returns an error if the configuration file is missing or malformed.
pub fn load_settings(cli: &Cli) -> Result<Settings, ConfigError> {
    let mut settings = ConfigLoader::new(cli.config.clone()).load()?;
    apply_overrides(cli, &mut settings);
    Ok(settings)
}

/// CLI flags are the highest-priority configuration layer.
fn apply_overrides(cli: &Cli, settings: &mut Settings) {
    if let Some(Commands::Serve { host, port, .. }) = &cli.command {
        if let Some(host) = host {
            settings.server.host = host.clone();
        }
        if let Some(port) = port {
            settings.server.port = *port;
        }
    }
    if let Some(level) = cli.log_level_override() {
        settings.logger.level = level.to_string();
    }
}

/// Dispatches the parsed command.
pub async fn execute_command(cli: &Cli, settings: Settings) -> anyhow::Result<()> {
    match cli.command_or_default() {
        Commands::Serve { dry_run, .. } => ServeCommandHandler::new(settings).execute(dry_run).await,
        Commands::Migrate { dry_run } => {
            MigrateCommandHandler::new(settings).execute(dry_run).await?;
            Ok(())
        }
    }
}
