//! Configuration section validators

use super::trait_def::Validate;
use super::url::validate_http_url;
use crate::config::models::*;
use std::collections::HashSet;
use tracing::debug;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating server configuration");

        if self.host.is_empty() {
            return Err("Server host cannot be empty".to_string());
        }

        if self.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }

        if let Some(workers) = self.workers {
            if workers == 0 {
                return Err("Worker count must be greater than 0".to_string());
            }
        }

        Ok(())
    }
}

impl Validate for EndpointConfig {
    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Endpoint name cannot be empty".to_string());
        }

        validate_http_url(&self.url, &format!("Endpoint '{}'", self.name))?;

        if let Some(code) = self
            .expected_status_codes
            .iter()
            .find(|code| !(100..=599).contains(*code))
        {
            return Err(format!(
                "Endpoint '{}' has invalid expected status code: {}",
                self.name, code
            ));
        }

        Ok(())
    }
}

impl Validate for HealthConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating health configuration");

        if self.timeout_ms == Some(0) {
            return Err("Healthcheck timeout must be greater than 0".to_string());
        }

        let mut names = HashSet::new();
        for endpoint in &self.endpoints {
            endpoint.validate()?;
            if !names.insert(endpoint.name.as_str()) {
                return Err(format!("Duplicate endpoint name: {}", endpoint.name));
            }
        }

        Ok(())
    }
}

impl Validate for StartupConfig {
    fn validate(&self) -> Result<(), String> {
        if let Some(path) = &self.diagnostics_path {
            if path.as_os_str().is_empty() {
                return Err("Diagnostics path cannot be empty".to_string());
            }
        }
        Ok(())
    }
}

impl Validate for TelemetryConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating telemetry configuration");

        if !(0.0..=1.0).contains(&self.sample_rate) {
            return Err(format!(
                "Telemetry sample rate must be between 0.0 and 1.0, got: {}",
                self.sample_rate
            ));
        }

        if self.batch_size == 0 {
            return Err("Telemetry batch size must be greater than 0".to_string());
        }

        if self.flush_interval_ms == 0 {
            return Err("Telemetry flush interval must be greater than 0".to_string());
        }

        if let Some(url) = &self.webhook_url {
            validate_http_url(url, "Telemetry webhook")?;
        }

        Ok(())
    }
}

impl Validate for LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let level = self.level.trim().to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(format!(
                "Invalid log level '{}', expected one of: {}",
                self.level,
                LOG_LEVELS.join(", ")
            ));
        }
        Ok(())
    }
}
