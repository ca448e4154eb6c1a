//! Health checking types and data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::endpoint::ServiceEndpoint;

/// Health classification shared by endpoint results and the aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum HealthStatus {
    /// Not checked, or nothing to check
    #[default]
    Unknown,
    /// Reachable, expected status code, under the latency threshold
    Healthy,
    /// Reachable with an expected status code, but slow
    Degraded,
    /// Unreachable, timed out, or answered with an unexpected status code
    Unhealthy,
}

impl HealthStatus {
    /// Fold a list of endpoint results into one overall status.
    ///
    /// Precedence is strict: Unhealthy > Degraded/Unknown > Healthy, and an
    /// empty list is Unknown.
    pub fn aggregate(services: &[ComponentHealth]) -> Self {
        if services.is_empty() {
            return HealthStatus::Unknown;
        }
        if services.iter().all(|s| s.status == HealthStatus::Healthy) {
            return HealthStatus::Healthy;
        }
        if services.iter().any(|s| s.status == HealthStatus::Unhealthy) {
            return HealthStatus::Unhealthy;
        }
        if services
            .iter()
            .any(|s| matches!(s.status, HealthStatus::Degraded | HealthStatus::Unknown))
        {
            return HealthStatus::Degraded;
        }
        HealthStatus::Healthy
    }

    /// Whether callers can still be served (Healthy or Degraded)
    pub fn is_operational(&self) -> bool {
        matches!(self, HealthStatus::Healthy | HealthStatus::Degraded)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Unknown => "unknown",
            HealthStatus::Healthy => "healthy",
            HealthStatus::Degraded => "degraded",
            HealthStatus::Unhealthy => "unhealthy",
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of checking one endpoint (the last attempt once retries are exhausted)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentHealth {
    /// Endpoint name
    pub name: String,
    /// URL that was requested
    pub url: String,
    /// Classification of the attempt
    pub status: HealthStatus,
    /// HTTP status code, when a response was received
    pub http_status_code: Option<u16>,
    /// Time from just before the request to the terminal outcome
    pub response_time_ms: u64,
    /// Error description (if not healthy)
    pub error: Option<String>,
    /// Additional metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, serde_json::Value>>,
    /// When the check finished
    pub checked_at: DateTime<Utc>,
}

impl ComponentHealth {
    fn base(endpoint: &ServiceEndpoint, status: HealthStatus, response_time_ms: u64) -> Self {
        Self {
            name: endpoint.name().to_string(),
            url: endpoint.check_url(),
            status,
            http_status_code: None,
            response_time_ms,
            error: None,
            metadata: None,
            checked_at: Utc::now(),
        }
    }

    /// Create a healthy result
    pub fn healthy(endpoint: &ServiceEndpoint, status_code: u16, response_time_ms: u64) -> Self {
        Self {
            http_status_code: Some(status_code),
            ..Self::base(endpoint, HealthStatus::Healthy, response_time_ms)
        }
    }

    /// Create a degraded (slow) result
    pub fn degraded(endpoint: &ServiceEndpoint, status_code: u16, response_time_ms: u64) -> Self {
        Self {
            http_status_code: Some(status_code),
            ..Self::base(endpoint, HealthStatus::Degraded, response_time_ms)
        }
    }

    /// Create an unhealthy result
    pub fn unhealthy(
        endpoint: &ServiceEndpoint,
        status_code: Option<u16>,
        error: impl Into<String>,
        response_time_ms: u64,
    ) -> Self {
        Self {
            http_status_code: status_code,
            error: Some(error.into()),
            ..Self::base(endpoint, HealthStatus::Unhealthy, response_time_ms)
        }
    }

    /// Create a result for an endpoint whose check never produced an outcome
    pub fn unknown(endpoint: &ServiceEndpoint, reason: impl Into<String>) -> Self {
        Self {
            error: Some(reason.into()),
            ..Self::base(endpoint, HealthStatus::Unknown, 0)
        }
    }

    /// Attach a metadata entry
    pub fn with_metadata(mut self, key: &str, value: serde_json::Value) -> Self {
        self.metadata
            .get_or_insert_with(HashMap::new)
            .insert(key.to_string(), value);
        self
    }

    #[inline]
    pub fn is_healthy(&self) -> bool {
        self.status == HealthStatus::Healthy
    }
}

/// Aggregate of one check run
///
/// `overall_status` is always derived from `services`; there is no setter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthcheckResult {
    overall_status: HealthStatus,
    services: Vec<ComponentHealth>,
    total_duration_ms: u64,
    timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    span_id: Option<String>,
}

impl HealthcheckResult {
    /// Build a result from per-endpoint outcomes, kept in the given order
    pub fn new(services: Vec<ComponentHealth>, total_duration_ms: u64) -> Self {
        Self {
            overall_status: HealthStatus::aggregate(&services),
            services,
            total_duration_ms,
            timestamp: Utc::now(),
            trace_id: None,
            span_id: None,
        }
    }

    /// Attach trace correlation ids
    pub fn with_trace(mut self, trace_id: String, span_id: String) -> Self {
        self.trace_id = Some(trace_id);
        self.span_id = Some(span_id);
        self
    }

    pub fn overall_status(&self) -> HealthStatus {
        self.overall_status
    }

    pub fn services(&self) -> &[ComponentHealth] {
        &self.services
    }

    pub fn total_duration_ms(&self) -> u64 {
        self.total_duration_ms
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    pub fn span_id(&self) -> Option<&str> {
        self.span_id.as_deref()
    }

    /// Whether the overall status is Healthy
    pub fn is_healthy(&self) -> bool {
        self.overall_status == HealthStatus::Healthy
    }

    /// Look up one service result by endpoint name
    pub fn service(&self, name: &str) -> Option<&ComponentHealth> {
        self.services.iter().find(|s| s.name == name)
    }

    pub fn healthy_count(&self) -> usize {
        self.count(HealthStatus::Healthy)
    }

    pub fn unhealthy_count(&self) -> usize {
        self.count(HealthStatus::Unhealthy)
    }

    pub fn degraded_count(&self) -> usize {
        self.count(HealthStatus::Degraded)
    }

    fn count(&self, status: HealthStatus) -> usize {
        self.services.iter().filter(|s| s.status == status).count()
    }
}
