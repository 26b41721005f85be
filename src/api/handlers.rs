//! HTTP request handlers for the payroll engine API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tokio::task::JoinError;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::PayPeriod;
use crate::payroll::PayrollGenerator;

use super::request::GeneratePayrollRequest;
use super::response::{ApiError, ApiErrorResponse, GeneratePayrollResponse, HealthResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/payroll/generate", post(generate_handler))
        .route("/payroll/:employee_id", get(list_payrolls_handler))
        .route("/payroll/:employee_id/:pay_period", get(get_payroll_handler))
        .with_state(state)
}

fn json_response<T: serde::Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(error: ApiErrorResponse) -> Response {
    json_response(error.status, error.error)
}

/// Runs generator work on the blocking pool.
///
/// Generation takes store locks and fsyncs payslip files, none of which may
/// run on an async worker thread.
async fn run_blocking<T, F>(state: &AppState, work: F) -> EngineResult<T>
where
    F: FnOnce(&PayrollGenerator) -> EngineResult<T> + Send + 'static,
    T: Send + 'static,
{
    let generator = state.shared_generator();
    tokio::task::spawn_blocking(move || work(&generator))
        .await
        .unwrap_or_else(|err| Err(task_failure(err)))
}

fn task_failure(error: JoinError) -> EngineError {
    EngineError::Storage {
        message: format!("payroll task failed: {}", error),
    }
}

/// Handler for GET /health.
async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Handler for POST /payroll/generate.
///
/// Generates and commits payroll for one employee and month. Returns 201 with
/// the payroll record, even when the payslip artifacts could not be written.
async fn generate_handler(
    State(state): State<AppState>,
    payload: Result<Json<GeneratePayrollRequest>, JsonRejection>,
) -> Response {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payroll generation request");

    // Handle JSON parsing errors
    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") {
                        ApiError::validation_error(body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            return json_response(StatusCode::BAD_REQUEST, error);
        }
    };

    let generation = match request.into_generation_request() {
        Ok(generation) => generation,
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Invalid pay period");
            return error_response(err.into());
        }
    };

    match run_blocking(&state, move |generator| generator.generate(&generation)).await {
        Ok(generated) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = generated.payroll.employee_id,
                pay_period = %generated.payroll.pay_period,
                net_salary = %generated.payroll.net_salary,
                payslip_written = generated.payslip_error.is_none(),
                "Payroll generation completed"
            );
            json_response(
                StatusCode::CREATED,
                GeneratePayrollResponse {
                    payroll: generated.payroll,
                    payslip_error: generated.payslip_error,
                },
            )
        }
        Err(err) if err.is_precondition_failure() => {
            info!(
                correlation_id = %correlation_id,
                employee_id = generation.employee_id,
                pay_period = %generation.pay_period,
                reason = err.reason(),
                "Payroll preconditions not met"
            );
            error_response(err.into())
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                employee_id = generation.employee_id,
                pay_period = %generation.pay_period,
                reason = err.reason(),
                error = %err,
                "Payroll generation rejected"
            );
            error_response(err.into())
        }
    }
}

/// Handler for GET /payroll/:employee_id/:pay_period.
async fn get_payroll_handler(
    State(state): State<AppState>,
    path: Result<Path<(u64, String)>, PathRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let (employee_id, raw_period) = match path {
        Ok(Path(params)) => params,
        Err(rejection) => {
            warn!(correlation_id = %correlation_id, error = %rejection, "Invalid path");
            return json_response(
                StatusCode::BAD_REQUEST,
                ApiError::validation_error(rejection.body_text()),
            );
        }
    };

    let lookup = match raw_period.parse::<PayPeriod>() {
        Ok(pay_period) => {
            run_blocking(&state, move |generator| {
                generator.find(employee_id, pay_period)
            })
            .await
        }
        Err(err) => Err(err),
    };

    match lookup {
        Ok(payroll) => {
            info!(
                correlation_id = %correlation_id,
                employee_id,
                pay_period = %payroll.pay_period,
                "Payroll lookup"
            );
            json_response(StatusCode::OK, payroll)
        }
        Err(err) => {
            info!(
                correlation_id = %correlation_id,
                employee_id,
                pay_period = %raw_period,
                reason = err.reason(),
                "Payroll lookup failed"
            );
            error_response(err.into())
        }
    }
}

/// Handler for GET /payroll/:employee_id.
///
/// Lists the employee's committed payroll records, oldest period first.
async fn list_payrolls_handler(
    State(state): State<AppState>,
    path: Result<Path<u64>, PathRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let employee_id = match path {
        Ok(Path(employee_id)) => employee_id,
        Err(rejection) => {
            warn!(correlation_id = %correlation_id, error = %rejection, "Invalid path");
            return json_response(
                StatusCode::BAD_REQUEST,
                ApiError::validation_error(rejection.body_text()),
            );
        }
    };

    match run_blocking(&state, move |generator| generator.history(employee_id)).await {
        Ok(payrolls) => {
            info!(
                correlation_id = %correlation_id,
                employee_id,
                records = payrolls.len(),
                "Payroll history"
            );
            json_response(StatusCode::OK, payrolls)
        }
        Err(err) => {
            info!(
                correlation_id = %correlation_id,
                employee_id,
                reason = err.reason(),
                "Payroll history failed"
            );
            error_response(err.into())
        }
    }
}
