//! Response types for the payroll engine API.
//!
//! This module defines the success bodies, the error body and the mapping
//! from engine errors to HTTP statuses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::models::Payroll;

/// Body of a successful `POST /payroll/generate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratePayrollResponse {
    /// The committed payroll record.
    pub payroll: Payroll,
    /// Set when the payslip artifacts could not be written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payslip_error: Option<String>,
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `ok` when the server answers.
    pub status: String,
    /// Engine version.
    pub version: String,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let code = error.reason();
        match error {
            EngineError::EmployeeNotFound { .. } | EngineError::PayrollNotFound { .. } => {
                ApiErrorResponse {
                    status: StatusCode::NOT_FOUND,
                    error: ApiError::new(code, error.to_string()),
                }
            }
            EngineError::NoActiveSalaryStructure { .. }
            | EngineError::MultipleActiveSalaryStructures { .. } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details(
                    code,
                    error.to_string(),
                    "Payroll requires exactly one active salary structure",
                ),
            },
            EngineError::PayrollAlreadyExists { .. } => ApiErrorResponse {
                status: StatusCode::CONFLICT,
                error: ApiError::with_details(
                    code,
                    error.to_string(),
                    "Payroll records are never overwritten",
                ),
            },
            EngineError::InvalidPayPeriod { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::new(code, error.to_string()),
            },
            EngineError::ConfigNotFound { .. }
            | EngineError::ConfigParseError { .. }
            | EngineError::Storage { .. }
            | EngineError::PayslipWrite { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::new(code, "Payroll generation failed"),
            },
        }
    }
}
