//! Logger Module
//!
//! `tracing-subscriber` setup with:
//! - Console output in full, compact or JSON format with color control
//! - Optional file output (no ANSI) in its own format
//! - `RUST_LOG` taking precedence over the configured level

pub mod config;
pub mod error;
pub(crate) mod writer;

pub use config::{ConsoleConfig, FileConfig, LogFormat, LoggerConfig};
pub use error::LoggerError;

use std::io::IsTerminal;

use tracing_subscriber::{
    EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Initialize the global logger with the given configuration
pub fn init_logger(config: &LoggerConfig) -> Result<(), LoggerError> {
    config.validate()?;

    let filter = build_filter(&config.level);
    let mut layers: Vec<BoxedLayer> = Vec::new();

    // File layer goes first so console ANSI settings cannot leak into span
    // fields rendered for the file (tokio-rs/tracing#1817).
    if config.file.enabled {
        layers.push(file_layer(&config.file)?);
    }
    if config.console.enabled {
        layers.push(console_layer(&config.console));
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()?;

    Ok(())
}

fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

fn console_layer(config: &ConsoleConfig) -> BoxedLayer {
    let use_ansi = config.colored && std::io::stdout().is_terminal();
    let layer = fmt::layer().with_ansi(use_ansi).with_target(true);

    match config.format {
        LogFormat::Full => layer.boxed(),
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Json => layer.json().boxed(),
    }
}

fn file_layer(config: &FileConfig) -> Result<BoxedLayer, LoggerError> {
    let writer = writer::open_log_file(config)?;
    let layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(writer);

    Ok(match config.format {
        LogFormat::Full => layer.boxed(),
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Json => layer.json().boxed(),
    })
}
