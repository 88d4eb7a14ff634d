//! Async database connection pool implementation.
//!
//! SQLite connections are blocking, so each one is wrapped in a
//! `SyncConnectionWrapper` that runs queries on tokio's blocking pool.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use diesel::result::{ConnectionError, ConnectionResult};
use diesel::SqliteConnection;
use diesel_async::pooled_connection::bb8::Pool;
use diesel_async::pooled_connection::{AsyncDieselConnectionManager, ManagerConfig};
use diesel_async::sync_connection_wrapper::SyncConnectionWrapper;
use diesel_async::{AsyncConnection, RunQueryDsl, SimpleAsyncConnection};

use crate::config::DatabaseConfig;
use crate::error::{AppError, AppResult};

/// Async SQLite connection type used everywhere in the crate.
pub type AsyncDbConnection = SyncConnectionWrapper<SqliteConnection>;

/// Async connection pool type alias.
///
/// bb8::Pool internally uses Arc, so Clone is cheap (just reference count increment).
/// Structures holding AsyncDbPool can derive Clone without additional Arc wrapping.
pub type AsyncDbPool = Pool<AsyncDbConnection>;

/// Applied to every new connection. SQLite leaves foreign keys off by default.
const CONNECTION_PRAGMAS: &str = "PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;";

/// Creates an async database connection pool.
///
/// An in-memory database only lives as long as its connection, so for
/// `:memory:` the pool holds exactly one connection and never recycles it.
///
/// # Errors
///
/// - `AppError::ConnectionPool` - If the first connection cannot be established
///
/// # Example
///
/// ```ignore
/// let pool = establish_async_connection_pool(&settings.database).await?;
/// let mut conn = pool.get().await?;
/// ```
pub async fn establish_async_connection_pool(config: &DatabaseConfig) -> AppResult<AsyncDbPool> {
    let mut manager_config = ManagerConfig::<AsyncDbConnection>::default();
    manager_config.custom_setup = Box::new(establish_connection);

    let manager = AsyncDieselConnectionManager::<AsyncDbConnection>::new_with_config(
        config.path.trim(),
        manager_config,
    );

    let builder = Pool::builder().connection_timeout(config.connection_timeout());
    let builder = if config.is_in_memory() {
        builder
            .max_size(1)
            .min_idle(Some(1))
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
    } else {
        builder.max_size(config.max_connections)
    };

    let pool = builder.build(manager).await?;
    Ok(pool)
}

fn establish_connection(
    url: &str,
) -> Pin<Box<dyn Future<Output = ConnectionResult<AsyncDbConnection>> + Send + '_>> {
    Box::pin(async move {
        let mut conn = AsyncDbConnection::establish(url).await?;
        conn.batch_execute(CONNECTION_PRAGMAS)
            .await
            .map_err(ConnectionError::CouldntSetupConfiguration)?;
        Ok(conn)
    })
}

/// Round-trips a trivial query, used by the readiness probe.
pub async fn ping(pool: &AsyncDbPool) -> AppResult<()> {
    let mut conn = pool.get().await?;
    diesel::sql_query("SELECT 1")
        .execute(&mut conn)
        .await
        .map_err(|e| AppError::Database {
            operation: "ping".to_string(),
            source: anyhow::Error::from(e),
        })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_pool_answers_ping() {
        let pool = establish_async_connection_pool(&DatabaseConfig::default())
            .await
            .expect("in-memory pool");
        assert_eq!(pool.state().connections, 1);
        ping(&pool).await.expect("ping");
    }

    #[tokio::test]
    async fn test_file_pool_creates_database() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = DatabaseConfig {
            path: dir.path().join("users.db").to_string_lossy().into_owned(),
            max_connections: 4,
            ..DatabaseConfig::default()
        };
        let pool = establish_async_connection_pool(&config).await.unwrap();
        ping(&pool).await.unwrap();
        assert!(dir.path().join("users.db").exists());
    }
}
