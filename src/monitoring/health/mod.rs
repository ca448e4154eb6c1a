//! Endpoint health checking
//!
//! Probes service endpoints over HTTP with per-attempt timeouts and retries,
//! then aggregates the per-endpoint results into one overall status.

mod checker;
mod classify;
mod endpoint;
mod options;
mod types;


pub use checker::{HealthcheckEngine, MAX_REDIRECTS};
pub use classify::{
    TIMEOUT_MESSAGE, TRANSPORT_ERROR_RULES, TransportErrorRule, error_chain_text,
    simplify_transport_error,
};
pub use endpoint::{DEFAULT_EXPECTED_STATUS_CODES, ServiceEndpoint};
pub use options::{
    API_READINESS_PATH, HealthcheckOptions, LOCAL_API_URL, LOCAL_WEBAPP_URL, PRODUCTION_API_URL,
    PRODUCTION_WEBAPP_URL, STAGING_API_URL, STAGING_WEBAPP_URL,
};
pub use types::{ComponentHealth, HealthStatus, HealthcheckResult};
