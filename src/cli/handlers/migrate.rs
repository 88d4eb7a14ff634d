//! Migrate command handler
//!
//! Applies pending migrations, or lists them with `--dry-run`.

use crate::config::settings::Settings;
use crate::db::{establish_async_connection_pool, pending_migrations, run_pending_migrations};
use crate::error::AppResult;

/// Handler for the migrate command
pub struct MigrateCommandHandler {
    config: Settings,
}

impl MigrateCommandHandler {
    /// Create a new migrate command handler
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Execute the migrate command
    ///
    /// Returns the versions that were applied, or that would be with `dry_run`.
    ///
    /// # Errors
    /// - Invalid database configuration
    /// - Database connection errors
    /// - Migration execution errors
    pub async fn execute(&self, dry_run: bool) -> AppResult<Vec<String>> {
        self.config.database.validate()?;
        if self.config.database.is_in_memory() {
            tracing::warn!("Migrating an in-memory database; the schema is discarded on exit");
        }

        let pool = establish_async_connection_pool(&self.config.database).await?;

        if dry_run {
            println!("Checking for pending migrations...");
            let pending = pending_migrations(&pool).await?;
            if pending.is_empty() {
                println!("✓ No pending migrations found - database is up to date");
            } else {
                println!("Found {} pending migration(s):", pending.len());
                for version in &pending {
                    println!("  - {}", version);
                }
                println!("\nRun without --dry-run to apply these migrations");
            }
            return Ok(pending);
        }

        println!("Running database migrations...");
        let applied = run_pending_migrations(&pool).await?;
        if applied.is_empty() {
            println!("✓ No migrations to apply - database is already up to date");
        } else {
            println!("✓ Applied {} migration(s):", applied.len());
            for version in &applied {
                println!("  - {}", version);
            }
        }
        Ok(applied)
    }

    /// Get the configuration
    pub fn config(&self) -> &Settings {
        &self.config
    }
}
