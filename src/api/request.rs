//! Request types for the payroll engine API.

use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::models::{PayPeriod, TaxRegime};
use crate::payroll::GenerationRequest;

/// Request body for `POST /payroll/generate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratePayrollRequest {
    /// The month to pay, `MM-YYYY`.
    pub month: String,
    /// The employee to pay.
    pub employee_id: u64,
    /// Tax regime; the configured default when omitted.
    #[serde(default)]
    pub regime: Option<TaxRegime>,
}

impl GeneratePayrollRequest {
    /// Validates the month and converts to a generation request.
    pub fn into_generation_request(self) -> EngineResult<GenerationRequest> {
        Ok(GenerationRequest {
            employee_id: self.employee_id,
            pay_period: PayPeriod::parse_request_month(&self.month)?,
            regime: self.regime,
        })
    }
}
