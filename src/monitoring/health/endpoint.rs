//! Checkable service endpoints

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Status codes treated as reachable when an endpoint doesn't name its own
pub const DEFAULT_EXPECTED_STATUS_CODES: [u16; 3] = [200, 201, 204];

/// A named URL representing one dependent service
///
/// Built once with the consuming `with_*` methods and never mutated after.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceEndpoint {
    name: String,
    url: String,
    health_path: Option<String>,
    expected_status_codes: BTreeSet<u16>,
    is_critical: bool,
}

impl ServiceEndpoint {
    /// Create an endpoint accepting the default status codes
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            health_path: None,
            expected_status_codes: DEFAULT_EXPECTED_STATUS_CODES.into_iter().collect(),
            is_critical: false,
        }
    }

    /// Append a health path to the base URL when checking
    pub fn with_health_path(mut self, path: impl Into<String>) -> Self {
        self.health_path = Some(path.into());
        self
    }

    /// Replace the accepted status codes
    pub fn with_expected_status_codes(mut self, codes: impl IntoIterator<Item = u16>) -> Self {
        self.expected_status_codes = codes.into_iter().collect();
        self
    }

    /// Mark the endpoint critical (informational, doesn't change aggregation)
    pub fn critical(mut self, is_critical: bool) -> Self {
        self.is_critical = is_critical;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn health_path(&self) -> Option<&str> {
        self.health_path.as_deref()
    }

    pub fn expected_status_codes(&self) -> &BTreeSet<u16> {
        &self.expected_status_codes
    }

    pub fn is_critical(&self) -> bool {
        self.is_critical
    }

    /// Whether a response code counts as reachable for this endpoint
    pub fn is_expected_status(&self, status_code: u16) -> bool {
        self.expected_status_codes.contains(&status_code)
    }

    /// Full URL to request: base URL plus health path, joined by exactly one `/`
    pub fn check_url(&self) -> String {
        match self.health_path.as_deref().map(str::trim) {
            Some(path) if !path.is_empty() => format!(
                "{}/{}",
                self.url.trim_end_matches('/'),
                path.trim_start_matches('/')
            ),
            _ => self.url.clone(),
        }
    }
}
