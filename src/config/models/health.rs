//! Healthcheck configuration

use crate::monitoring::health::{HealthcheckOptions, ServiceEndpoint};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Named option preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthPreset {
    Local,
    Production,
    PreDeploy,
}

impl HealthPreset {
    pub fn options(self) -> HealthcheckOptions {
        match self {
            HealthPreset::Local => HealthcheckOptions::local(),
            HealthPreset::Production => HealthcheckOptions::production(),
            HealthPreset::PreDeploy => HealthcheckOptions::pre_deploy(),
        }
    }
}

impl FromStr for HealthPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(HealthPreset::Local),
            "production" | "prod" => Ok(HealthPreset::Production),
            "pre_deploy" | "pre-deploy" | "predeploy" => Ok(HealthPreset::PreDeploy),
            other => Err(format!("Unknown health preset: {}", other)),
        }
    }
}

/// One configured endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_path: Option<String>,
    /// Empty means the endpoint default (200, 201, 204)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub expected_status_codes: Vec<u16>,
    #[serde(default)]
    pub critical: bool,
}

impl EndpointConfig {
    pub fn to_endpoint(&self) -> ServiceEndpoint {
        let mut endpoint = ServiceEndpoint::new(&self.name, &self.url).critical(self.critical);
        if let Some(path) = &self.health_path {
            endpoint = endpoint.with_health_path(path);
        }
        if !self.expected_status_codes.is_empty() {
            endpoint = endpoint.with_expected_status_codes(self.expected_status_codes.iter().copied());
        }
        endpoint
    }
}

/// Healthcheck section: a preset plus per-field overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<HealthPreset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_delay_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degraded_threshold_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_metadata: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_tracing: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accept_invalid_certs: Option<bool>,
    /// Replaces the preset's endpoints when non-empty
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub endpoints: Vec<EndpointConfig>,
}

impl HealthConfig {
    /// Resolve into engine options: preset first, then overrides
    pub fn to_options(&self) -> HealthcheckOptions {
        let mut options = self
            .preset
            .map(HealthPreset::options)
            .unwrap_or_default();

        if let Some(ms) = self.timeout_ms {
            options.timeout = Duration::from_millis(ms);
        }
        if let Some(parallel) = self.parallel {
            options.parallel = parallel;
        }
        if let Some(count) = self.retry_count {
            options.retry_count = count;
        }
        if let Some(ms) = self.retry_delay_ms {
            options.retry_delay = Duration::from_millis(ms);
        }
        if let Some(ms) = self.degraded_threshold_ms {
            options.degraded_threshold_ms = ms;
        }
        if let Some(include) = self.include_metadata {
            options.include_metadata = include;
        }
        if let Some(enable) = self.enable_tracing {
            options.enable_tracing = enable;
        }
        if let Some(accept) = self.accept_invalid_certs {
            options.accept_invalid_certs = accept;
        }
        if !self.endpoints.is_empty() {
            options.custom_endpoints = self.endpoints.iter().map(EndpointConfig::to_endpoint).collect();
        }

        options
    }
}
