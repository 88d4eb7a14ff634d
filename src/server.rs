//! Server module for managing HTTP server lifecycle
//!
//! This module handles startup (database, migrations, admin seeding),
//! serving, and graceful shutdown.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::signal;

use crate::api::routes::create_router;
use crate::config::{Environment, settings::Settings};
use crate::db::{establish_async_connection_pool, run_pending_migrations};
use crate::error::AppResult;
use crate::repositories::Repositories;
use crate::services::{AdminAccount, SeedReport, ensure_admin_with_timeout};
use crate::state::AppState;
use crate::utils::password::{Argon2Hasher, PasswordHasher};

/// HTTP server manager
pub struct Server {
    settings: Settings,
}

impl Server {
    /// Create a new server with the given settings
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Start the server and run until shutdown signal
    ///
    /// This method:
    /// 1. Logs startup information
    /// 2. Prepares the database and seeds the admin account
    /// 3. Binds to configured address
    /// 4. Starts the HTTP server with graceful shutdown
    ///
    /// The listener is only bound once seeding has succeeded, so a failed
    /// seed never leaves a half-initialized service accepting requests.
    pub async fn run(self) -> anyhow::Result<()> {
        tracing::info!(
            app_name = %self.settings.application.name,
            app_version = %self.settings.application.version,
            environment = %Environment::from_env(),
            "Application starting"
        );

        tracing::info!(
            host = %self.settings.server.host,
            port = self.settings.server.port,
            request_timeout = self.settings.server.request_timeout,
            "Server configuration loaded"
        );

        tracing::info!(
            in_memory = self.settings.database.is_in_memory(),
            max_connections = self.settings.database.max_connections,
            connection_timeout = self.settings.database.connection_timeout,
            "Database configuration loaded"
        );

        // Never log the secret itself
        tracing::info!(
            expiration_hours = self.settings.jwt.expiration_hours,
            fallback_secret = self.settings.jwt.uses_fallback_secret(),
            "JWT configuration loaded"
        );
        if self.settings.jwt.uses_fallback_secret() {
            tracing::warn!("JWT_SECRET is not set, signing tokens with the built-in development secret");
        } else if self.settings.jwt.is_weak_secret() {
            tracing::warn!("JWT secret is shorter than 32 bytes and would be rejected in production");
        }

        let state = prepare(&self.settings).await.inspect_err(|e| {
            tracing::error!(error = %e, "Startup failed");
        })?;

        let router = create_router(state, self.settings.server.request_timeout());
        tracing::info!("Router configured");

        let address = self.settings.server.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!(error = %e, address = %address, "Failed to bind to address");
            anyhow::anyhow!("Failed to bind to {}: {}", address, e)
        })?;

        tracing::info!(address = %address, "Server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

/// Opens the pool, applies pending migrations and seeds the admin account,
/// returning the state the router is built from.
pub async fn prepare(settings: &Settings) -> AppResult<AppState> {
    tracing::info!("Initializing database connection pool...");
    let pool = establish_async_connection_pool(&settings.database).await?;
    tracing::info!("Database connection pool initialized");

    let applied = run_pending_migrations(&pool).await?;
    if applied.is_empty() {
        tracing::info!("Database schema is up to date");
    }
    for version in &applied {
        tracing::info!(migration = %version, "Applied migration");
    }

    let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2Hasher::new());
    let repos = Repositories::new(pool.clone());
    let report = ensure_admin_with_timeout(
        &repos.roles,
        &repos.users,
        hasher.as_ref(),
        &AdminAccount::from(&settings.admin),
        settings.admin.seed_timeout(),
    )
    .await?;
    log_seed_report(&settings.admin.email, report);

    let state = AppState::new(pool, &settings.jwt, hasher);
    tracing::info!("Application state created");

    Ok(state)
}

fn log_seed_report(email: &str, report: SeedReport) {
    if report.is_noop() {
        tracing::info!(email = %email, "Admin account already present");
    } else {
        tracing::info!(
            email = %email,
            role_created = report.role_created,
            user_created = report.user_created,
            role_repaired = report.role_repaired,
            "Admin account seeded"
        );
    }
}

/// Waits for a shutdown signal (Ctrl+C or SIGTERM).
///
/// A handler that cannot be installed is logged and never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
