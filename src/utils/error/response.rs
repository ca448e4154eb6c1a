//! HTTP response handling for errors

use super::types::HealthError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

impl ResponseError for HealthError {
    fn status_code(&self) -> StatusCode {
        match self {
            HealthError::Validation(_) => StatusCode::BAD_REQUEST,
            HealthError::Cancelled { .. } => StatusCode::SERVICE_UNAVAILABLE,
            HealthError::HttpClient(_) | HealthError::Telemetry(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (error_code, message) = match self {
            HealthError::Config(_) => ("CONFIG_ERROR", self.to_string()),
            HealthError::Validation(_) => ("VALIDATION_ERROR", self.to_string()),
            HealthError::HttpClient(_) => ("HTTP_CLIENT_ERROR", self.to_string()),
            HealthError::Cancelled { .. } => ("CHECK_CANCELLED", self.to_string()),
            HealthError::Telemetry(_) => ("TELEMETRY_ERROR", self.to_string()),
            // Don't leak IO paths or parser internals to HTTP callers
            HealthError::Io(_) | HealthError::Serialization(_) | HealthError::Yaml(_) => {
                ("INTERNAL_ERROR", "An internal error occurred".to_string())
            }
            HealthError::Server(_) | HealthError::Internal(_) => {
                ("INTERNAL_ERROR", self.to_string())
            }
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: error_code.to_string(),
                message,
                timestamp: chrono::Utc::now().timestamp(),
            },
        };

        HttpResponse::build(self.status_code()).json(error_response)
    }
}

/// Standard error response format
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail information
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub timestamp: i64,
}
