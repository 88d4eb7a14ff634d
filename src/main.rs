use clap::Parser;

use users_service::cli::{self, Cli};
use users_service::config::Environment;
use users_service::logger::init_logger;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // The logger is not up yet, so configuration problems go to stderr
    let settings = cli::load_settings(&cli).inspect_err(|e| {
        eprintln!("Configuration error: {}", e);
    })?;
    let environment = Environment::from_env();
    settings.validate(environment).inspect_err(|e| {
        eprintln!("Invalid configuration: {}", e);
    })?;

    init_logger(&settings.logger).inspect_err(|e| {
        eprintln!("Logger initialization error: {}", e);
    })?;

    tracing::debug!(environment = %environment, "Configuration loaded");

    if let Err(e) = cli::execute_command(&cli, settings).await {
        tracing::error!(error = %format!("{:#}", e), "Command failed");
        return Err(e);
    }

    Ok(())
}
