//! Server builder and the host boot sequence

use crate::config::Config;
use crate::monitoring::health::{HealthStatus, HealthcheckEngine, HealthcheckResult};
use crate::monitoring::startup::{StartupPhase, StartupProbe};
use crate::monitoring::telemetry::TelemetryTracer;
use crate::server::server::HttpServer;
use crate::server::state::AppState;
use crate::utils::error::{HealthError, Result};
use crate::utils::logging::init_logging;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Config file picked up when no path is given
pub const DEFAULT_CONFIG_PATH: &str = "config/health.yaml";

/// Assembles the probe server from its parts
#[derive(Default)]
pub struct ServerBuilder {
    config: Option<Config>,
    probe: Option<Arc<StartupProbe>>,
    engine: Option<HealthcheckEngine>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Share an existing probe; otherwise one is created from the startup config
    pub fn with_probe(mut self, probe: Arc<StartupProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Use a prepared engine; otherwise one is built from the health config
    pub fn with_engine(mut self, engine: HealthcheckEngine) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Build the HTTP server
    pub fn build(self) -> Result<HttpServer> {
        let config = self
            .config
            .ok_or_else(|| HealthError::Config("Configuration is required".to_string()))?;

        let probe = match self.probe {
            Some(probe) => probe,
            None => Arc::new(StartupProbe::new(config.startup.resolved_path())),
        };

        let engine = match self.engine {
            Some(engine) => engine,
            None => build_engine(&config)?,
        };

        Ok(HttpServer::new(AppState::new(config, probe, engine)))
    }
}

/// Engine for the configured options, wired to telemetry when enabled
pub fn build_engine(config: &Config) -> Result<HealthcheckEngine> {
    let engine = HealthcheckEngine::new(config.health.to_options())?;
    if !config.telemetry.enabled {
        return Ok(engine);
    }

    let tracer = Arc::new(TelemetryTracer::from_config(&config.telemetry)?);
    tracer.start_background_flush();
    Ok(engine.with_tracer(tracer))
}

async fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_file(path).await,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => Config::from_file(DEFAULT_CONFIG_PATH).await,
        None => Config::from_env(),
    }
}

/// Report every non-healthy service from the warm-up run as a startup warning
pub fn report_warmup(probe: &StartupProbe, result: &HealthcheckResult) {
    for service in result.services() {
        match service.status {
            HealthStatus::Healthy => {}
            HealthStatus::Degraded => probe.report_warning(
                &format!(
                    "Service '{}' is slow ({}ms)",
                    service.name, service.response_time_ms
                ),
                None,
            ),
            _ => {
                let fix = format!("Verify that {} is running and reachable", service.url);
                probe.report_warning(
                    &format!(
                        "Service '{}' is {}: {}",
                        service.name,
                        service.status,
                        service.error.as_deref().unwrap_or("no details")
                    ),
                    Some(&fix),
                );
            }
        }
    }
}

/// Load configuration, walk the probe through startup and serve until stopped
pub async fn run_server(config_path: Option<&Path>) -> Result<()> {
    let config = match load_config(config_path).await {
        Ok(config) => config,
        Err(e) => {
            let _ = init_logging(&Default::default());
            let probe = StartupProbe::with_default_path();
            probe.report_failure(&e, "Loading configuration");
            return Err(e);
        }
    };

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("{}", e);
    }

    let probe = Arc::new(StartupProbe::new(config.startup.resolved_path()));
    match serve(config, Arc::clone(&probe)).await {
        Ok(()) => Ok(()),
        Err(e) => {
            probe.report_failure(&e, "Startup");
            Err(e)
        }
    }
}

async fn serve(config: Config, probe: Arc<StartupProbe>) -> Result<()> {
    probe.set_phase(StartupPhase::ConfiguringServices, Some("Configuring healthcheck engine"));
    let engine = build_engine(&config)?;
    let warmup_engine = engine.clone();

    probe.set_phase(StartupPhase::BuildingApp, None);
    let server = ServerBuilder::new()
        .with_config(config)
        .with_probe(Arc::clone(&probe))
        .with_engine(engine)
        .build()?;

    probe.set_phase(StartupPhase::RegisteringEndpoints, None);
    let shutdown = server.state().shutdown.clone();
    let (running, _stop) = server.bind()?;

    probe.set_phase(StartupPhase::StartingServices, None);
    let warmup = async {
        probe.set_phase(StartupPhase::WarmingUp, Some("Running initial service checks"));
        let result = match warmup_engine.check_all_with_cancellation(&shutdown).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Initial service check interrupted: {}", e);
                return;
            }
        };
        info!(
            overall = %result.overall_status(),
            healthy = result.healthy_count(),
            unhealthy = result.unhealthy_count(),
            "Initial service check finished"
        );
        if !result.is_healthy() {
            warn!("Starting with unhealthy dependencies");
        }
        report_warmup(&probe, &result);
        probe.mark_ready();
    };

    let (served, ()) = tokio::join!(running, warmup);
    served.map_err(|e| HealthError::server(format!("Server error: {}", e)))?;

    info!("HTTP server stopped");
    Ok(())
}
