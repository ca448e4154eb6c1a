//! Configuration data models
//!
//! This module defines all configuration structures used by the health host.

#![allow(missing_docs)]

pub mod health;
pub mod logging;
pub mod server;
pub mod startup;
pub mod telemetry;

pub use health::*;
pub use logging::*;
pub use server::*;
pub use startup::*;
pub use telemetry::*;

/// Default values for configuration
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default probe server port
pub fn default_port() -> u16 {
    8080
}

pub fn default_true() -> bool {
    true
}

/// Keep every telemetry event
pub fn default_sample_rate() -> f64 {
    1.0
}

pub fn default_batch_size() -> usize {
    crate::monitoring::telemetry::DEFAULT_BATCH_SIZE
}

pub fn default_flush_interval_ms() -> u64 {
    10_000
}

pub fn default_log_level() -> String {
    "info".to_string()
}
