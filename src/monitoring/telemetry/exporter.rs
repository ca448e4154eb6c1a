//! Telemetry exporters

use super::types::TelemetryEvent;
use crate::utils::error::{HealthError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use tracing::info;

/// Destination for flushed telemetry batches
#[async_trait]
pub trait TelemetryExporter: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Deliver one batch
    async fn export(&self, batch: &[TelemetryEvent]) -> Result<()>;
}

/// Writes each event to the tracing subscriber
#[derive(Debug, Default)]
pub struct LogExporter;

#[async_trait]
impl TelemetryExporter for LogExporter {
    fn name(&self) -> &str {
        "log"
    }

    async fn export(&self, batch: &[TelemetryEvent]) -> Result<()> {
        for event in batch {
            info!(
                target: "telemetry",
                name = %event.name,
                trace_id = %event.trace_id,
                span_id = %event.span_id,
                parent_span_id = event.parent_span_id.as_deref().unwrap_or(""),
                duration_ms = event.duration_ms,
                status = ?event.status,
                attributes = ?event.attributes,
                "telemetry event"
            );
        }
        Ok(())
    }
}

/// POSTs each batch as a JSON array
#[derive(Debug, Clone)]
pub struct WebhookExporter {
    client: Client,
    url: String,
    headers: HashMap<String, String>,
}

impl WebhookExporter {
    pub fn new(url: impl Into<String>, headers: HashMap<String, String>) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self {
            client,
            url: url.into(),
            headers,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl TelemetryExporter for WebhookExporter {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn export(&self, batch: &[TelemetryEvent]) -> Result<()> {
        let mut request = self.client.post(&self.url).json(batch);
        for (key, value) in &self.headers {
            request = request.header(key, value);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(HealthError::telemetry(format!(
                "Webhook {} returned {}",
                self.url,
                response.status()
            )));
        }
        Ok(())
    }
}
