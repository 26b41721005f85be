//! Calculation logic for the payroll engine.
//!
//! This module contains the pure functions behind monthly payroll generation:
//! attendance aggregation, leave reconciliation against policy quotas, salary
//! proration with components and overtime, and progressive slab tax. Each
//! function returns its result together with the audit steps explaining it.

mod attendance;
mod leave;
mod rounding;
mod salary;
mod tax;

pub use attendance::{AttendanceSummary, aggregate_attendance};
pub use leave::{
    LeaveAllocation, LeaveReconciliation, clip_to_period, inclusive_days, reconcile_leave,
    used_before,
};
pub use rounding::round_money;
pub use salary::{SalaryComputation, SalaryInputs, compute_salary};
pub use tax::{MONTHS_PER_YEAR, SlabTax, TaxComputation, annualize, calculate_monthly_tax};
