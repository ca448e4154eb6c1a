//! Application state shared across HTTP handlers

use crate::config::Config;
use crate::monitoring::health::HealthcheckEngine;
use crate::monitoring::startup::StartupProbe;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// HTTP server state shared across handlers
///
/// The probe is the same instance the boot sequence advances; handlers only
/// read it.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Host configuration (shared read-only)
    pub config: Arc<Config>,
    /// Startup probe
    pub probe: Arc<StartupProbe>,
    /// Engine behind `/health/services`
    pub engine: Arc<HealthcheckEngine>,
    /// Cancelled on shutdown; aborts in-flight service checks
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(config: Config, probe: Arc<StartupProbe>, engine: HealthcheckEngine) -> Self {
        Self {
            config: Arc::new(config),
            probe,
            engine: Arc::new(engine),
            shutdown: CancellationToken::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
