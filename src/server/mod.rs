//! HTTP server implementation
//!
//! Serves the readiness, liveness and startup probes plus the service and
//! diagnostics views.

pub mod builder;
pub mod routes;
pub mod server;
pub mod state;
