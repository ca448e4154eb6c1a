//! Configuration management for the health host
//!
//! This module handles loading, environment overrides and validation of the
//! server, healthcheck, startup, telemetry and logging sections.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{HealthError, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

/// Main configuration struct
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub health: HealthConfig,
    #[serde(default)]
    pub startup: StartupConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file, then apply environment overrides
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| HealthError::Config(format!("Failed to read config file: {}", e)))?;

        let mut config = Self::parse_yaml(&content)?;
        config.apply_env_overrides()?;
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Defaults plus environment overrides
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let mut config = Self::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse YAML without touching the environment
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config = Self::parse_yaml(content)?;
        config.validate()?;
        Ok(config)
    }

    fn parse_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| HealthError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_env_overrides_with(|key| std::env::var(key).ok())
    }

    /// Apply overrides using `lookup` as the variable source
    pub fn apply_env_overrides_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HEALTH_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("HEALTH_PORT") {
            self.server.port = parse_var("HEALTH_PORT", &port)?;
        }

        if let Some(preset) = lookup("HEALTH_PRESET") {
            self.health.preset = Some(parse_var("HEALTH_PRESET", &preset)?);
        }
        if let Some(timeout) = lookup("HEALTH_TIMEOUT_MS") {
            self.health.timeout_ms = Some(parse_var("HEALTH_TIMEOUT_MS", &timeout)?);
        }
        if let Some(count) = lookup("HEALTH_RETRY_COUNT") {
            self.health.retry_count = Some(parse_var("HEALTH_RETRY_COUNT", &count)?);
        }
        if let Some(delay) = lookup("HEALTH_RETRY_DELAY_MS") {
            self.health.retry_delay_ms = Some(parse_var("HEALTH_RETRY_DELAY_MS", &delay)?);
        }
        if let Some(parallel) = lookup("HEALTH_PARALLEL") {
            self.health.parallel = Some(parse_var("HEALTH_PARALLEL", &parallel)?);
        }
        if let Some(threshold) = lookup("HEALTH_DEGRADED_THRESHOLD_MS") {
            self.health.degraded_threshold_ms =
                Some(parse_var("HEALTH_DEGRADED_THRESHOLD_MS", &threshold)?);
        }

        if let Some(path) = lookup("STARTUP_DIAGNOSTICS_PATH") {
            self.startup.diagnostics_path = Some(PathBuf::from(path));
        }

        if let Some(enabled) = lookup("TELEMETRY_ENABLED") {
            self.telemetry.enabled = parse_var("TELEMETRY_ENABLED", &enabled)?;
        }
        if let Some(rate) = lookup("TELEMETRY_SAMPLE_RATE") {
            self.telemetry.sample_rate = parse_var("TELEMETRY_SAMPLE_RATE", &rate)?;
        }

        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("LOG_FORMAT") {
            self.logging.format = parse_var("LOG_FORMAT", &format)?;
        }

        Ok(())
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.server
            .validate()
            .map_err(|e| HealthError::Config(format!("Server config error: {}", e)))?;
        self.health
            .validate()
            .map_err(|e| HealthError::Config(format!("Health config error: {}", e)))?;
        self.startup
            .validate()
            .map_err(|e| HealthError::Config(format!("Startup config error: {}", e)))?;
        self.telemetry
            .validate()
            .map_err(|e| HealthError::Config(format!("Telemetry config error: {}", e)))?;
        self.logging
            .validate()
            .map_err(|e| HealthError::Config(format!("Logging config error: {}", e)))?;

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| HealthError::Config(format!("Failed to serialize config to JSON: {}", e)))
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| HealthError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}

fn parse_var<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| HealthError::Config(format!("Invalid value for {}: {}", key, e)))
}
