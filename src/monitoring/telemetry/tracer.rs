//! Batching telemetry tracer

use super::exporter::TelemetryExporter;
use super::sampler::TelemetrySampler;
use super::types::TelemetryEvent;
use crate::config::TelemetryConfig;
use crate::utils::error::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error};

/// Default number of buffered events that triggers a flush
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Buffers sampled events and hands them to exporters in batches
pub struct TelemetryTracer {
    sampler: TelemetrySampler,
    buffer: Mutex<Vec<TelemetryEvent>>,
    batch_size: usize,
    flush_interval: Duration,
    exporters: Vec<Arc<dyn TelemetryExporter>>,
}

impl Default for TelemetryTracer {
    fn default() -> Self {
        Self::new(TelemetrySampler::default(), DEFAULT_BATCH_SIZE)
    }
}

impl TelemetryTracer {
    pub fn new(sampler: TelemetrySampler, batch_size: usize) -> Self {
        Self {
            sampler,
            buffer: Mutex::new(Vec::new()),
            batch_size: batch_size.max(1),
            flush_interval: Duration::from_secs(10),
            exporters: Vec::new(),
        }
    }

    /// Build a tracer from configuration (log exporter always, webhook when configured)
    pub fn from_config(config: &TelemetryConfig) -> Result<Self> {
        let mut tracer = Self::new(TelemetrySampler::new(config.sample_rate), config.batch_size)
            .with_flush_interval(Duration::from_millis(config.flush_interval_ms))
            .with_exporter(Arc::new(super::LogExporter));

        if let Some(url) = &config.webhook_url {
            let webhook = super::WebhookExporter::new(url.clone(), config.webhook_headers.clone())?;
            tracer = tracer.with_exporter(Arc::new(webhook));
        }

        Ok(tracer)
    }

    pub fn with_exporter(mut self, exporter: Arc<dyn TelemetryExporter>) -> Self {
        self.exporters.push(exporter);
        self
    }

    pub fn with_flush_interval(mut self, flush_interval: Duration) -> Self {
        self.flush_interval = flush_interval;
        self
    }

    pub fn sampler(&self) -> &TelemetrySampler {
        &self.sampler
    }

    /// Number of events waiting for the next flush
    pub async fn pending(&self) -> usize {
        self.buffer.lock().await.len()
    }

    /// Record an event, subject to sampling. Flushes when the batch is full.
    pub async fn record(&self, event: TelemetryEvent) {
        if !self.sampler.should_sample() {
            return;
        }

        let full = {
            let mut buffer = self.buffer.lock().await;
            buffer.push(event);
            buffer.len() >= self.batch_size
        };

        if full {
            self.flush().await;
        }
    }

    /// Send everything buffered to every exporter. Export errors are logged and dropped.
    pub async fn flush(&self) {
        let batch: Vec<TelemetryEvent> = {
            let mut buffer = self.buffer.lock().await;
            if buffer.is_empty() {
                return;
            }
            buffer.drain(..).collect()
        };

        debug!("Flushing {} telemetry events", batch.len());

        for exporter in &self.exporters {
            if let Err(e) = exporter.export(&batch).await {
                error!(
                    exporter = exporter.name(),
                    "Failed to export telemetry batch: {}", e
                );
            }
        }
    }

    /// Flush on a fixed interval until the returned task is aborted
    pub fn start_background_flush(self: &Arc<Self>) -> JoinHandle<()> {
        let tracer = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tracer.flush_interval);
            loop {
                interval.tick().await;
                tracer.flush().await;
            }
        })
    }
}
