//! Logging setup
//!
//! Installs the global `tracing` subscriber for the host binary.

use crate::config::{LogFormat, LoggingConfig};
use crate::utils::error::{HealthError, Result};
use tracing_subscriber::EnvFilter;

/// Build the filter: `RUST_LOG` when set and valid, otherwise the configured level
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.level.trim()))
}

/// Install the global subscriber
///
/// Fails instead of panicking when a subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_target(true)
        .with_thread_ids(false);

    let installed = match config.format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().flatten_event(true).try_init(),
    };

    installed.map_err(|e| HealthError::internal(format!("Failed to initialize logging: {}", e)))
}
