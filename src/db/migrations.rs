//! Embedded schema migrations.
//!
//! Migrations run on a pooled connection rather than a fresh one so that an
//! in-memory database is migrated in place.

use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use crate::db::AsyncDbPool;
use crate::error::{AppError, AppResult};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Applies every pending migration and returns the versions applied.
pub async fn run_pending_migrations(pool: &AsyncDbPool) -> AppResult<Vec<String>> {
    let mut conn = pool.get().await?;
    conn.spawn_blocking(|c| {
        c.run_pending_migrations(MIGRATIONS)
            .map(|applied| applied.iter().map(|m| m.to_string()).collect())
            .map_err(diesel::result::Error::QueryBuilderError)
    })
    .await
    .map_err(|e| AppError::Database {
        operation: "run pending migrations".to_string(),
        source: anyhow::Error::from(e),
    })
}

/// Lists the migrations that `run_pending_migrations` would apply.
pub async fn pending_migrations(pool: &AsyncDbPool) -> AppResult<Vec<String>> {
    let mut conn = pool.get().await?;
    conn.spawn_blocking(|c| {
        c.pending_migrations(MIGRATIONS)
            .map(|pending| pending.iter().map(|m| m.name().version().to_string()).collect())
            .map_err(diesel::result::Error::QueryBuilderError)
    })
    .await
    .map_err(|e| AppError::Database {
        operation: "check pending migrations".to_string(),
        source: anyhow::Error::from(e),
    })
}
