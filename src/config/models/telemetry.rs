//! Telemetry configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default)]
    pub enabled: bool,
    /// Fraction of events kept, 0.0 to 1.0
    #[serde(default = "default_sample_rate")]
    pub sample_rate: f64,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_flush_interval_ms")]
    pub flush_interval_ms: u64,
    /// Collector that receives batches as JSON
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub webhook_headers: HashMap<String, String>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            sample_rate: default_sample_rate(),
            batch_size: default_batch_size(),
            flush_interval_ms: default_flush_interval_ms(),
            webhook_url: None,
            webhook_headers: HashMap::new(),
        }
    }
}
