//! # platform-health
//!
//! Health verification for a multi-service platform.
//!
//! ## Features
//!
//! - **Endpoint checks**: parallel or sequential HTTP checks with per-attempt
//!   timeouts, retries and latency-based degradation
//! - **Aggregation**: one overall status per run with strict precedence
//!   (Unhealthy > Degraded/Unknown > Healthy)
//! - **Startup probe**: boot phases, failure capture with suggested fixes and a
//!   diagnostics file that other processes can poll
//! - **Probe endpoints**: `/health/ready`, `/health/live` and `/health/startup`
//!   for orchestrators
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use platform_health::{HealthcheckEngine, HealthcheckOptions, ServiceEndpoint};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let options = HealthcheckOptions::default()
//!         .with_endpoint(ServiceEndpoint::new("api", "http://localhost:5010").with_health_path("/healthz/readiness"));
//!     let engine = HealthcheckEngine::new(options)?;
//!
//!     let result = engine.check_all().await;
//!     println!("{}: {} healthy", result.overall_status(), result.healthy_count());
//!     Ok(())
//! }
//! ```
//!
//! ## Startup probe
//!
//! ```rust,no_run
//! use platform_health::{StartupPhase, StartupProbe};
//!
//! let probe = StartupProbe::with_default_path();
//! probe.set_phase(StartupPhase::RunningMigrations, None);
//! probe.mark_ready();
//! assert!(probe.is_ready());
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod monitoring;
pub mod server;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use monitoring::health::{
    ComponentHealth, HealthStatus, HealthcheckEngine, HealthcheckOptions, HealthcheckResult,
    ServiceEndpoint,
};
pub use monitoring::startup::{StartupEvent, StartupPhase, StartupProbe, StartupSnapshot};
pub use monitoring::telemetry::TelemetryTracer;
pub use utils::error::{HealthError, Result};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
