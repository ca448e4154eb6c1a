//! Probe endpoints
//!
//! Readiness, liveness and startup probes for orchestrators, plus on-demand
//! service checks and the full startup diagnostics.

use crate::monitoring::startup::{StartupErrorDetails, StartupPhase, StartupProbe};
use crate::server::state::AppState;
use crate::utils::error::HealthError;
use actix_web::{HttpResponse, http::StatusCode, web};
use serde::Serialize;
use tracing::debug;

/// Configure probe routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/health")
            .route("/ready", web::get().to(readiness))
            .route("/live", web::get().to(liveness))
            .route("/startup", web::get().to(startup))
            .route("/services", web::get().to(services))
            .route("/diagnostics", web::get().to(diagnostics)),
    );
}

/// Body shared by the three probes
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeStatus {
    pub status: &'static str,
    pub phase: StartupPhase,
    pub progress: u8,
    pub elapsed_ms: u64,
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_details: Option<StartupErrorDetails>,
}

impl ProbeStatus {
    fn from_probe(probe: &StartupProbe, status: &'static str, with_details: bool) -> Self {
        let snapshot = probe.snapshot();
        Self {
            status,
            phase: snapshot.phase,
            progress: snapshot.progress,
            elapsed_ms: snapshot.elapsed_ms,
            error: snapshot.error,
            error_details: if with_details {
                snapshot.error_details
            } else {
                None
            },
        }
    }
}

fn probe_response(code: StatusCode, body: ProbeStatus) -> HttpResponse {
    HttpResponse::build(code).json(body)
}

/// 200 once the probe is Ready
pub async fn readiness(state: web::Data<AppState>) -> HttpResponse {
    debug!("Readiness probe requested");

    if state.probe.is_ready() {
        probe_response(StatusCode::OK, ProbeStatus::from_probe(&state.probe, "ready", false))
    } else {
        probe_response(
            StatusCode::SERVICE_UNAVAILABLE,
            ProbeStatus::from_probe(&state.probe, "not_ready", false),
        )
    }
}

/// 503 only after a startup failure
pub async fn liveness(state: web::Data<AppState>) -> HttpResponse {
    debug!("Liveness probe requested");

    if state.probe.is_alive() {
        probe_response(StatusCode::OK, ProbeStatus::from_probe(&state.probe, "alive", false))
    } else {
        probe_response(
            StatusCode::SERVICE_UNAVAILABLE,
            ProbeStatus::from_probe(&state.probe, "failed", true),
        )
    }
}

/// 200 once startup has finished either way, so slow boots aren't killed
pub async fn startup(state: web::Data<AppState>) -> HttpResponse {
    debug!("Startup probe requested");

    match state.probe.phase() {
        StartupPhase::Ready => {
            probe_response(StatusCode::OK, ProbeStatus::from_probe(&state.probe, "started", false))
        }
        StartupPhase::Failed => {
            probe_response(StatusCode::OK, ProbeStatus::from_probe(&state.probe, "failed", true))
        }
        _ => probe_response(
            StatusCode::SERVICE_UNAVAILABLE,
            ProbeStatus::from_probe(&state.probe, "starting", false),
        ),
    }
}

/// Run the configured checks now
pub async fn services(state: web::Data<AppState>) -> Result<HttpResponse, HealthError> {
    debug!("Service check requested");

    let result = state
        .engine
        .check_all_with_cancellation(&state.shutdown)
        .await?;

    let code = if result.overall_status().is_operational() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    Ok(HttpResponse::build(code).json(result))
}

/// Full startup snapshot including the event log
pub async fn diagnostics(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.probe.snapshot())
}
