//! Healthcheck configuration and environment presets

use super::endpoint::ServiceEndpoint;
use std::time::Duration;

/// Local API base URL
pub const LOCAL_API_URL: &str = "http://localhost:5010";
/// Local web application URL
pub const LOCAL_WEBAPP_URL: &str = "http://localhost:4200";
/// Production API base URL
pub const PRODUCTION_API_URL: &str = "https://api.platform.example.com";
/// Production web application URL
pub const PRODUCTION_WEBAPP_URL: &str = "https://app.platform.example.com";
/// Staging API base URL, checked before a deploy is promoted
pub const STAGING_API_URL: &str = "https://staging-api.platform.example.com";
/// Staging web application URL
pub const STAGING_WEBAPP_URL: &str = "https://staging-app.platform.example.com";
/// Readiness path exposed by the API
pub const API_READINESS_PATH: &str = "/healthz/readiness";

/// Options controlling one healthcheck run
///
/// Each endpoint gets `retry_count + 1` attempts at most.
#[derive(Debug, Clone)]
pub struct HealthcheckOptions {
    /// Per-attempt HTTP timeout
    pub timeout: Duration,
    /// Check endpoints concurrently (only when there's more than one)
    pub parallel: bool,
    /// Extra attempts after the first
    pub retry_count: u32,
    /// Sleep between attempts
    pub retry_delay: Duration,
    /// Latency at or above which an expected response is Degraded
    pub degraded_threshold_ms: u64,
    /// Attach attempt/status metadata to each result
    pub include_metadata: bool,
    /// Assign trace ids and emit telemetry events
    pub enable_tracing: bool,
    /// Accept self-signed certificates
    pub accept_invalid_certs: bool,
    /// Endpoints to check, in order
    pub custom_endpoints: Vec<ServiceEndpoint>,
}

impl Default for HealthcheckOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            parallel: true,
            retry_count: 1,
            retry_delay: Duration::from_millis(500),
            degraded_threshold_ms: 5000,
            include_metadata: false,
            enable_tracing: false,
            accept_invalid_certs: false,
            custom_endpoints: Vec::new(),
        }
    }
}

impl HealthcheckOptions {
    /// Developer machine: local API and web app, fast timeouts, self-signed certs allowed
    pub fn local() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            accept_invalid_certs: true,
            custom_endpoints: vec![
                ServiceEndpoint::new("api", LOCAL_API_URL)
                    .with_health_path(API_READINESS_PATH)
                    .critical(true),
                ServiceEndpoint::new("webapp", LOCAL_WEBAPP_URL),
            ],
            ..Self::default()
        }
    }

    /// Production: strict TLS, more retries, tracing on
    pub fn production() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            retry_count: 2,
            retry_delay: Duration::from_secs(1),
            enable_tracing: true,
            custom_endpoints: vec![
                ServiceEndpoint::new("api", PRODUCTION_API_URL)
                    .with_health_path(API_READINESS_PATH)
                    .critical(true),
                ServiceEndpoint::new("webapp", PRODUCTION_WEBAPP_URL).critical(true),
            ],
            ..Self::default()
        }
    }

    /// Pre-deploy gate against staging: sequential, patient, with full metadata
    pub fn pre_deploy() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            parallel: false,
            retry_count: 3,
            retry_delay: Duration::from_secs(2),
            degraded_threshold_ms: 10_000,
            include_metadata: true,
            enable_tracing: true,
            accept_invalid_certs: true,
            custom_endpoints: vec![
                ServiceEndpoint::new("api", STAGING_API_URL)
                    .with_health_path(API_READINESS_PATH)
                    .critical(true),
                ServiceEndpoint::new("webapp", STAGING_WEBAPP_URL),
            ],
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count;
        self
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn with_degraded_threshold_ms(mut self, threshold_ms: u64) -> Self {
        self.degraded_threshold_ms = threshold_ms;
        self
    }

    pub fn with_metadata(mut self, include_metadata: bool) -> Self {
        self.include_metadata = include_metadata;
        self
    }

    pub fn with_tracing(mut self, enable_tracing: bool) -> Self {
        self.enable_tracing = enable_tracing;
        self
    }

    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Append one endpoint
    pub fn with_endpoint(mut self, endpoint: ServiceEndpoint) -> Self {
        self.custom_endpoints.push(endpoint);
        self
    }

    /// Replace the endpoint list
    pub fn with_endpoints(mut self, endpoints: Vec<ServiceEndpoint>) -> Self {
        self.custom_endpoints = endpoints;
        self
    }

    /// Total attempts per endpoint
    #[inline]
    pub fn max_attempts(&self) -> u32 {
        self.retry_count.saturating_add(1)
    }
}
