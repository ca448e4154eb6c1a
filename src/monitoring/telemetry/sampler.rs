//! Deterministic sampler for high-frequency telemetry

use std::sync::atomic::{AtomicU64, Ordering};

/// Keeps one of every `1 / rate` events (rounded)
#[derive(Debug)]
pub struct TelemetrySampler {
    rate: f64,
    counter: AtomicU64,
}

impl Default for TelemetrySampler {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl TelemetrySampler {
    /// Create a sampler; the rate is clamped to `0.0..=1.0`
    pub fn new(rate: f64) -> Self {
        let rate = if rate.is_nan() { 0.0 } else { rate.clamp(0.0, 1.0) };
        Self {
            rate,
            counter: AtomicU64::new(0),
        }
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Whether the next event should be kept
    pub fn should_sample(&self) -> bool {
        if self.rate >= 1.0 {
            return true;
        }
        if self.rate <= 0.0 {
            return false;
        }

        let count = self.counter.fetch_add(1, Ordering::Relaxed);
        let interval = ((1.0 / self.rate).round() as u64).max(1);
        count % interval == 0
    }
}
