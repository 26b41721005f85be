//! Configuration types for payroll generation.
//!
//! This module contains the strongly-typed configuration structures that are
//! deserialized from `engine.yaml` and from seed dataset files.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{
    AttendanceRecord, Employee, LeavePolicy, LeaveRecord, OvertimeRequest, SalaryStructure,
    TaxRegime, TaxSlab,
};

/// How percentage and fixed components reach earnings and deductions.
///
/// Breakdown lines always display the prorated figure. The mode decides
/// whether totals receive that same figure or the full monthly one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentProration {
    /// Totals receive the full, non-prorated component value.
    #[default]
    AppliedFull,
    /// Totals receive the prorated value shown on the payslip.
    Prorated,
}

/// Engine settings loaded from `engine.yaml`.
///
/// Every key is optional; missing keys take the defaults of
/// [`EngineConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Monthly hours used as the overtime pay divisor.
    pub standard_monthly_hours: Decimal,
    /// Regime used when a request does not name one.
    pub default_tax_regime: TaxRegime,
    /// Component proration mode.
    pub component_proration: ComponentProration,
    /// Directory payslip artifacts are written to.
    pub payslip_dir: String,
    /// Address the HTTP server binds to.
    pub bind_address: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            standard_monthly_hours: Decimal::from(160),
            default_tax_regime: TaxRegime::New,
            component_proration: ComponentProration::AppliedFull,
            payslip_dir: "./payslips".to_string(),
            bind_address: "127.0.0.1:8080".to_string(),
        }
    }
}

/// A seed dataset of payroll inputs, as read from `directory.yaml`.
///
/// This stands in for the HR system's persistence when the engine runs on its
/// own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryData {
    /// Employees.
    pub employees: Vec<Employee>,
    /// Daily attendance rows.
    pub attendance: Vec<AttendanceRecord>,
    /// Overtime requests.
    pub overtime_requests: Vec<OvertimeRequest>,
    /// Leave records, all statuses.
    pub leaves: Vec<LeaveRecord>,
    /// Leave policies for every organization.
    pub leave_policies: Vec<LeavePolicy>,
    /// Salary structures, active and inactive.
    pub salary_structures: Vec<SalaryStructure>,
    /// Tax slabs for every organization and regime.
    pub tax_slabs: Vec<TaxSlab>,
}
