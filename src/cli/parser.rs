//! CLI argument parsing with clap

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// User management HTTP service
#[derive(Parser, Debug)]
#[command(name = "users-service")]
#[command(about = "User management HTTP service with admin bootstrap")]
#[command(long_about = "
users-service exposes registration, login, profile and user administration
over HTTP. On startup it applies pending migrations and makes sure the
configured administrator account exists before accepting requests.

EXAMPLES:
    # Start the server with defaults (in-memory database, port 8080)
    users-service

    # Persist to a file and listen on localhost only
    DB_PATH=/var/lib/users/users.db users-service serve --host 127.0.0.1

    # Use a configuration file
    users-service --config /etc/users-service/config.toml serve

    # Check configuration without starting the server
    users-service serve --dry-run

    # Apply pending migrations, or list them
    users-service migrate
    users-service migrate --dry-run
")]
#[command(version = crate::clap_long_version())]
pub struct Cli {
    /// Subcommand to execute (defaults to `serve`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path (TOML)
    ///
    /// Overrides USERS_CONFIG_FILE. Environment variables still take
    /// precedence over values read from the file.
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log errors only
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start the web server (default)
    Serve {
        /// Host address to bind to
        #[arg(long, value_name = "ADDRESS", value_parser = super::validation::validate_host)]
        host: Option<String>,

        /// Port number to listen on
        #[arg(short, long, value_name = "PORT", value_parser = super::validation::validate_port)]
        port: Option<u16>,

        /// Validate configuration and exit
        #[arg(long)]
        dry_run: bool,
    },
    /// Apply pending database migrations
    Migrate {
        /// List pending migrations without applying them
        #[arg(long)]
        dry_run: bool,
    },
}

impl Cli {
    /// The command to run, `serve` when none was given
    pub fn command_or_default(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Serve {
            host: None,
            port: None,
            dry_run: false,
        })
    }

    /// Level forced by `--verbose` / `--quiet`, if any
    pub fn log_level_override(&self) -> Option<&'static str> {
        if self.verbose {
            Some("debug")
        } else if self.quiet {
            Some("error")
        } else {
            None
        }
    }
}
