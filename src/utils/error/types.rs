//! Core error type definitions

use crate::monitoring::health::ComponentHealth;
use thiserror::Error;

/// Result type alias for the crate
pub type Result<T> = std::result::Result<T, HealthError>;

/// Main error type for the health engine
///
/// Endpoint-level failures never surface here: they are captured as
/// `Unhealthy` [`ComponentHealth`] records instead.
#[derive(Error, Debug)]
pub enum HealthError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// HTTP client errors (client construction, telemetry export)
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Caller-requested cancellation; carries the results that had already completed
    #[error("Health check cancelled ({} endpoint(s) completed)", completed.len())]
    Cancelled { completed: Vec<ComponentHealth> },

    /// Telemetry export errors
    #[error("Telemetry error: {0}")]
    Telemetry(String),

    /// HTTP server errors
    #[error("Server error: {0}")]
    Server(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}
