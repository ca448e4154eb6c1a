//! Error handling for the health engine
//!
//! This module defines the crate error type and its HTTP mapping.

mod helpers;
mod response;
mod types;

pub use response::{ErrorDetail, ErrorResponse};
pub use types::{HealthError, Result};
