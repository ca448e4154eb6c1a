//! Integration tests for platform-health
//!
//! These tests drive real HTTP traffic against wiremock servers and closed
//! local ports.

pub mod config_tests;
pub mod healthcheck_engine_tests;
pub mod startup_probe_tests;
