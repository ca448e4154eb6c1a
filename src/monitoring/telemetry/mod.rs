//! Telemetry façade
//!
//! Sampled, batched telemetry events with pluggable exporters. The health
//! engine emits one event per checked endpoint plus one per run.

mod exporter;
mod sampler;
mod tracer;
mod types;


pub use exporter::{LogExporter, TelemetryExporter, WebhookExporter};
pub use sampler::TelemetrySampler;
pub use tracer::{DEFAULT_BATCH_SIZE, TelemetryTracer};
pub use types::{TelemetryEvent, TelemetryStatus, new_span_id, new_trace_id};
