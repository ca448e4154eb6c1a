//! Monitoring and observability
//!
//! Endpoint health checks, the startup probe and the telemetry façade the
//! engine reports through.

pub mod health;
pub mod startup;
pub mod telemetry;
