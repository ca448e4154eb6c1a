//! Healthcheck engine
//!
//! Checks every configured endpoint (concurrently or in list order), retrying
//! non-healthy attempts, and folds the results into a [`HealthcheckResult`].

use crate::monitoring::telemetry::{
    TelemetryEvent, TelemetryStatus, TelemetryTracer, new_span_id, new_trace_id,
};
use crate::utils::error::{HealthError, Result};
use futures::future::join_all;
use reqwest::{Client, ClientBuilder, redirect};
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::classify::{TIMEOUT_MESSAGE, error_chain_text, simplify_transport_error};
use super::endpoint::ServiceEndpoint;
use super::options::HealthcheckOptions;
use super::types::{ComponentHealth, HealthStatus, HealthcheckResult};

/// Maximum redirect hops followed per attempt
pub const MAX_REDIRECTS: usize = 3;

/// Endpoint health checker
///
/// The HTTP connection pool is shared by every check made through one engine.
#[derive(Clone)]
pub struct HealthcheckEngine {
    client: Client,
    options: HealthcheckOptions,
    tracer: Option<Arc<TelemetryTracer>>,
}

impl std::fmt::Debug for HealthcheckEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthcheckEngine")
            .field("options", &self.options)
            .field("tracer", &self.tracer.is_some())
            .finish()
    }
}

impl HealthcheckEngine {
    /// Create an engine that owns its HTTP client
    pub fn new(options: HealthcheckOptions) -> Result<Self> {
        let client = Self::build_client(&options)?;
        Ok(Self::with_client(client, options))
    }

    /// Create an engine on a caller-supplied client (the caller keeps the pool)
    pub fn with_client(client: Client, options: HealthcheckOptions) -> Self {
        Self {
            client,
            options,
            tracer: None,
        }
    }

    /// Engine for the Local preset
    pub fn local() -> Result<Self> {
        Self::new(HealthcheckOptions::local())
    }

    /// Engine for the Production preset
    pub fn production() -> Result<Self> {
        Self::new(HealthcheckOptions::production())
    }

    /// Route telemetry events to a tracer (used only when tracing is enabled)
    pub fn with_tracer(mut self, tracer: Arc<TelemetryTracer>) -> Self {
        self.tracer = Some(tracer);
        self
    }

    pub fn options(&self) -> &HealthcheckOptions {
        &self.options
    }

    fn build_client(options: &HealthcheckOptions) -> Result<Client> {
        let client = ClientBuilder::new()
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .danger_accept_invalid_certs(options.accept_invalid_certs)
            .user_agent(concat!("platform-health/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(client)
    }

    /// Check the Local preset endpoints
    pub async fn check_local() -> Result<HealthcheckResult> {
        Ok(Self::local()?.check_all().await)
    }

    /// Check the Production preset endpoints
    pub async fn check_production() -> Result<HealthcheckResult> {
        Ok(Self::production()?.check_all().await)
    }

    /// Check one endpoint and report whether it came back Healthy
    pub async fn is_healthy(&self, endpoint: &ServiceEndpoint) -> bool {
        self.check(endpoint).await.status == HealthStatus::Healthy
    }

    /// Check every configured endpoint
    pub async fn check_all(&self) -> HealthcheckResult {
        match self.run_all(None).await {
            Ok(result) => result,
            Err(HealthError::Cancelled { completed }) => HealthcheckResult::new(completed, 0),
            Err(e) => {
                warn!("Unexpected healthcheck failure: {}", e);
                HealthcheckResult::new(Vec::new(), 0)
            }
        }
    }

    /// Check every configured endpoint, stopping early if `cancel` fires.
    ///
    /// On cancellation the returned [`HealthError::Cancelled`] carries every
    /// result that had already finished.
    pub async fn check_all_with_cancellation(
        &self,
        cancel: &CancellationToken,
    ) -> Result<HealthcheckResult> {
        self.run_all(Some(cancel)).await
    }

    /// Check one endpoint with retries
    pub async fn check(&self, endpoint: &ServiceEndpoint) -> ComponentHealth {
        self.check_with_retries(endpoint, None)
            .await
            .unwrap_or_else(|| ComponentHealth::unknown(endpoint, "Check cancelled"))
    }

    /// Check one endpoint with retries, stopping early if `cancel` fires
    pub async fn check_with_cancellation(
        &self,
        endpoint: &ServiceEndpoint,
        cancel: &CancellationToken,
    ) -> Result<ComponentHealth> {
        self.check_with_retries(endpoint, Some(cancel))
            .await
            .ok_or_else(|| HealthError::cancelled(Vec::new()))
    }

    async fn run_all(&self, cancel: Option<&CancellationToken>) -> Result<HealthcheckResult> {
        let endpoints = &self.options.custom_endpoints;
        let trace = self
            .options
            .enable_tracing
            .then(|| (new_trace_id(), new_span_id()));

        debug!(
            endpoints = endpoints.len(),
            parallel = self.options.parallel,
            "Running healthcheck"
        );

        let start_time = Instant::now();
        let outcomes: Vec<Option<ComponentHealth>> =
            if self.options.parallel && endpoints.len() > 1 {
                // join_all yields in input order, not completion order
                join_all(
                    endpoints
                        .iter()
                        .map(|endpoint| self.check_with_retries(endpoint, cancel)),
                )
                .await
            } else {
                let mut outcomes = Vec::with_capacity(endpoints.len());
                for endpoint in endpoints {
                    outcomes.push(self.check_with_retries(endpoint, cancel).await);
                }
                outcomes
            };
        let total_duration_ms = start_time.elapsed().as_millis() as u64;

        let was_cancelled = outcomes.iter().any(Option::is_none);
        let services: Vec<ComponentHealth> = outcomes.into_iter().flatten().collect();

        if was_cancelled {
            info!(
                completed = services.len(),
                total = endpoints.len(),
                "Healthcheck cancelled"
            );
            return Err(HealthError::cancelled(services));
        }

        let mut result = HealthcheckResult::new(services, total_duration_ms);
        if let Some((trace_id, span_id)) = trace {
            self.record_telemetry(&trace_id, &span_id, &result).await;
            result = result.with_trace(trace_id, span_id);
        }

        info!(
            status = %result.overall_status(),
            healthy = result.healthy_count(),
            degraded = result.degraded_count(),
            unhealthy = result.unhealthy_count(),
            duration_ms = total_duration_ms,
            "Healthcheck completed"
        );

        Ok(result)
    }

    /// Up to `retry_count + 1` attempts; the last attempt is returned once
    /// they're exhausted. `None` means the caller cancelled.
    async fn check_with_retries(
        &self,
        endpoint: &ServiceEndpoint,
        cancel: Option<&CancellationToken>,
    ) -> Option<ComponentHealth> {
        let max_attempts = self.options.max_attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;

            let health = tokio::select! {
                biased;
                _ = cancelled(cancel) => return None,
                health = self.attempt(endpoint) => health,
            };

            if health.status == HealthStatus::Healthy || attempt >= max_attempts {
                if health.status != HealthStatus::Healthy {
                    warn!(
                        endpoint = endpoint.name(),
                        status = %health.status,
                        attempts = attempt,
                        error = health.error.as_deref().unwrap_or(""),
                        "Endpoint not healthy after retries"
                    );
                }
                return Some(self.decorate(endpoint, health, attempt));
            }

            debug!(
                endpoint = endpoint.name(),
                status = %health.status,
                attempt,
                "Attempt not healthy, retrying in {:?}",
                self.options.retry_delay
            );

            tokio::select! {
                biased;
                _ = cancelled(cancel) => return None,
                _ = tokio::time::sleep(self.options.retry_delay) => {}
            }
        }
    }

    /// A single GET against the endpoint
    async fn attempt(&self, endpoint: &ServiceEndpoint) -> ComponentHealth {
        let url = endpoint.check_url();
        let start_time = Instant::now();

        let outcome = self
            .client
            .get(&url)
            .timeout(self.options.timeout)
            .send()
            .await;
        let response_time_ms = start_time.elapsed().as_millis() as u64;

        match outcome {
            Ok(response) => {
                let status_code = response.status().as_u16();
                let health = self.classify_response(endpoint, status_code, response_time_ms);
                match response.content_length() {
                    Some(length) if self.options.include_metadata => {
                        health.with_metadata("contentLength", length.into())
                    }
                    _ => health,
                }
            }
            Err(e) if e.is_timeout() => {
                ComponentHealth::unhealthy(endpoint, None, TIMEOUT_MESSAGE, response_time_ms)
            }
            // The URL is left out so its host and path can't match a rule
            Err(e) if e.is_connect() || e.is_request() => ComponentHealth::unhealthy(
                endpoint,
                None,
                simplify_transport_error(&error_chain_text(&e.without_url())),
                response_time_ms,
            ),
            Err(e) => ComponentHealth::unhealthy(
                endpoint,
                None,
                e.without_url().to_string(),
                response_time_ms,
            ),
        }
    }

    /// Classify a received response by status code and latency
    pub fn classify_response(
        &self,
        endpoint: &ServiceEndpoint,
        status_code: u16,
        response_time_ms: u64,
    ) -> ComponentHealth {
        if !endpoint.is_expected_status(status_code) {
            ComponentHealth::unhealthy(
                endpoint,
                Some(status_code),
                format!("Unexpected status: {}", status_code),
                response_time_ms,
            )
        } else if response_time_ms >= self.options.degraded_threshold_ms {
            ComponentHealth::degraded(endpoint, status_code, response_time_ms)
        } else {
            ComponentHealth::healthy(endpoint, status_code, response_time_ms)
        }
    }

    fn decorate(
        &self,
        endpoint: &ServiceEndpoint,
        health: ComponentHealth,
        attempts: u32,
    ) -> ComponentHealth {
        if !self.options.include_metadata {
            return health;
        }
        let expected: Vec<u16> = endpoint.expected_status_codes().iter().copied().collect();
        health
            .with_metadata("attempts", attempts.into())
            .with_metadata("critical", endpoint.is_critical().into())
            .with_metadata("expectedStatusCodes", expected.into())
    }

    async fn record_telemetry(&self, trace_id: &str, span_id: &str, result: &HealthcheckResult) {
        let Some(tracer) = &self.tracer else {
            return;
        };

        for service in result.services() {
            let status = if service.status.is_operational() {
                TelemetryStatus::Ok
            } else {
                TelemetryStatus::Error
            };
            let mut event = TelemetryEvent::new("healthcheck.endpoint", trace_id, new_span_id())
                .with_parent(span_id)
                .with_duration_ms(service.response_time_ms)
                .with_status(status)
                .with_attribute("endpoint", service.name.clone().into())
                .with_attribute("url", service.url.clone().into())
                .with_attribute("health", service.status.as_str().into());
            if let Some(code) = service.http_status_code {
                event = event.with_attribute("httpStatusCode", code.into());
            }
            if let Some(error) = &service.error {
                event = event.with_attribute("error", error.clone().into());
            }
            tracer.record(event).await;
        }

        let status = if result.overall_status().is_operational() {
            TelemetryStatus::Ok
        } else {
            TelemetryStatus::Error
        };
        let run = TelemetryEvent::new("healthcheck.check_all", trace_id, span_id)
            .with_duration_ms(result.total_duration_ms())
            .with_status(status)
            .with_attribute("overallStatus", result.overall_status().as_str().into())
            .with_attribute("services", result.services().len().into());
        tracer.record(run).await;
    }
}

/// Resolves when the token fires; never resolves without a token
async fn cancelled(cancel: Option<&CancellationToken>) {
    match cancel {
        Some(token) => token.cancelled().await,
        None => std::future::pending().await,
    }
}
