//! Helper functions for creating specific error types

use super::types::HealthError;
use crate::monitoring::health::ComponentHealth;

/// Helper functions for creating specific errors
impl HealthError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn telemetry<S: Into<String>>(message: S) -> Self {
        Self::Telemetry(message.into())
    }

    pub fn server<S: Into<String>>(message: S) -> Self {
        Self::Server(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    pub fn cancelled(completed: Vec<ComponentHealth>) -> Self {
        Self::Cancelled { completed }
    }

    /// Whether this error is a caller-requested cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}
