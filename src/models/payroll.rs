//! Payroll record and audit trace models.
//!
//! This module contains the [`Payroll`] type persisted once per employee and
//! pay period, its [`ComponentLine`] breakdown, and the audit structures
//! every calculation step contributes to.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ComponentCategory, PayPeriod};

/// One line of the salary component breakdown.
///
/// `amount` is the figure shown on the payslip; `applied_amount` is what was
/// actually added to earnings or deductions. The two differ when components
/// are applied at full value while displayed prorated.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{ComponentCategory, ComponentLine};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let line = ComponentLine {
///     name: "HRA".to_string(),
///     category: ComponentCategory::Earning,
///     is_custom: false,
///     amount: Decimal::from_str("11200.00").unwrap(),
///     applied_amount: Decimal::from_str("12000.00").unwrap(),
/// };
/// assert!(line.category.is_earning());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentLine {
    /// Component name.
    pub name: String,
    /// Where the component was routed.
    pub category: ComponentCategory,
    /// Whether the component is a custom fixed amount.
    pub is_custom: bool,
    /// The prorated figure displayed on the payslip.
    pub amount: Decimal,
    /// The figure added to earnings or deductions.
    pub applied_amount: Decimal,
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings record data inconsistencies that were tolerated rather than
/// failing the run, such as a missing tax configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

impl AuditWarning {
    /// Creates a warning.
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        severity: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            severity: severity.into(),
        }
    }
}

/// The complete audit trace for a payroll run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

/// The persisted payroll record for one employee and one pay period.
///
/// At most one record exists per `(employee_id, pay_period)`; it is never
/// overwritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payroll {
    /// Unique identifier of the record.
    pub id: Uuid,
    /// The employee paid.
    pub employee_id: u64,
    /// The employee's organization.
    pub organization_id: u64,
    /// The month paid, `YYYY-MM`.
    pub pay_period: PayPeriod,
    /// Total earnings after components, overtime and proration.
    pub gross_earnings: Decimal,
    /// Total deductions excluding tax.
    pub gross_deductions: Decimal,
    /// `gross_earnings - (gross_deductions + tax_deducted)`.
    pub net_salary: Decimal,
    /// `present_days + 0.5 * half_days`.
    pub working_days: Decimal,
    /// Days recorded present.
    pub present_days: u32,
    /// Days recorded as half days.
    pub half_days: u32,
    /// Days recorded absent.
    pub absent_days: u32,
    /// Approved leave days falling inside the month (paid plus unpaid).
    pub leave_days: Decimal,
    /// Leave days covered by a paid policy quota.
    pub paid_leave_days: Decimal,
    /// Leave days not covered by a paid quota.
    pub unpaid_leave_days: Decimal,
    /// HR-approved overtime hours.
    pub overtime_hours: Decimal,
    /// Pay for overtime hours.
    pub overtime_amount: Decimal,
    /// Deduction for unpaid leave days.
    pub unpaid_leave_deduction: Decimal,
    /// Monthly tax liability.
    pub tax_deducted: Decimal,
    /// Line-itemized salary components.
    pub component_breakdown: Vec<ComponentLine>,
    /// Location of the rendered payslip, once written.
    pub payslip_link: Option<String>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

/// Builds the artifact key `{employee_id}_{pay_period}`.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{PayPeriod, payslip_key};
///
/// let period = PayPeriod::new(2025, 11).unwrap();
/// assert_eq!(payslip_key(7, period), "7_2025-11");
/// ```
pub fn payslip_key(employee_id: u64, pay_period: PayPeriod) -> String {
    format!("{}_{}", employee_id, pay_period)
}
