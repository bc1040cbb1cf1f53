//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the global `tracing` subscriber
//! - Change the log level at runtime
//!
//! # Design Decisions
//! - JSON format for production, pretty format for development
//! - `RUST_LOG` wins over the configured level at startup
//! - The filter sits behind a reload layer; `LogLevelHandle` swaps it

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

use crate::config::{LogFormat, LoggingConfig};

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Logging setup errors.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("unknown log level {0:?} (expected one of trace, debug, info, warn, error)")]
    UnknownLevel(String),

    #[error("failed to install subscriber: {0}")]
    Init(String),

    #[error("failed to reload filter: {0}")]
    Reload(String),
}

/// Runtime control over the installed log filter.
#[derive(Debug, Clone)]
pub struct LogLevelHandle {
    handle: reload::Handle<EnvFilter, Registry>,
}

impl LogLevelHandle {
    /// Switch every crate filter to `level`.
    pub fn set_level(&self, level: &str) -> Result<(), LoggingError> {
        let level = parse_level(level)?;
        self.handle
            .reload(EnvFilter::new(directives(level)))
            .map_err(|e| LoggingError::Reload(e.to_string()))?;

        tracing::info!(level, "Log level changed");
        Ok(())
    }
}

/// Install the global subscriber.
pub fn init(config: &LoggingConfig) -> Result<LogLevelHandle, LoggingError> {
    let level = parse_level(&config.level)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives(level)));
    let (filter, handle) = reload::Layer::new(filter);

    let registry = tracing_subscriber::registry().with(filter);
    let installed = match config.format {
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
        LogFormat::Pretty => registry.with(fmt::layer()).try_init(),
    };
    installed.map_err(|e| LoggingError::Init(e.to_string()))?;

    Ok(LogLevelHandle { handle })
}

/// Normalize a level name.
pub fn parse_level(level: &str) -> Result<&'static str, LoggingError> {
    LEVELS
        .iter()
        .find(|known| known.eq_ignore_ascii_case(level.trim()))
        .copied()
        .ok_or_else(|| LoggingError::UnknownLevel(level.to_string()))
}

fn directives(level: &str) -> String {
    format!("waypoint={level},tower_http={level}")
}
