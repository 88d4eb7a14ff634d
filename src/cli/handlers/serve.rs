//! Serve command handler
//!
//! Either validates the configuration and exits (`--dry-run`) or runs the
//! server until shutdown.

use crate::config::settings::Settings;
use crate::server::Server;

/// Handler for the serve command
pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    /// Create a new serve command handler
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Runs the server, or only reports what it would do when `dry_run` is set.
    ///
    /// The settings have already been validated by the caller.
    pub async fn execute(self, dry_run: bool) -> anyhow::Result<()> {
        if dry_run {
            self.report();
            return Ok(());
        }
        Server::new(self.config).run().await
    }

    fn report(&self) {
        let database = if self.config.database.is_in_memory() {
            "in-memory (data is lost on exit)".to_string()
        } else {
            self.config.database.path.clone()
        };
        println!("✓ Configuration is valid");
        println!("✓ Server would bind to: {}", self.config.server.address());
        println!("✓ Database: {}", database);
        println!("✓ Admin account: {}", self.config.admin.email);
        println!("Dry run completed successfully");
    }

    /// Get the configuration
    pub fn config(&self) -> &Settings {
        &self.config
    }
}
