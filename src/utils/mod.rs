//! Shared utilities
//!
//! - **error**: the crate error type and its HTTP mapping
//! - **logging**: subscriber installation

pub mod error;
pub mod logging;
