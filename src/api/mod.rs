//! HTTP API module for the payroll engine.
//!
//! This module exposes payroll generation and lookup over REST.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::GeneratePayrollRequest;
pub use response::{ApiError, GeneratePayrollResponse, HealthResponse};
pub use state::AppState;
