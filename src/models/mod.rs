//! Core data models for the payroll engine.
//!
//! This module contains the input records consumed by payroll generation and
//! the payroll record it produces.

mod attendance;
mod employee;
mod leave;
mod pay_period;
mod payroll;
mod salary;
mod tax;

pub use attendance::{AttendanceRecord, AttendanceStatus, OvertimeRequest, OvertimeStatus};
pub use employee::Employee;
pub use leave::{LeavePolicy, LeaveRecord, LeaveStatus, LeaveType};
pub use pay_period::PayPeriod;
pub use payroll::{AuditStep, AuditTrace, AuditWarning, ComponentLine, Payroll, payslip_key};
pub use salary::{ComponentBasis, ComponentCategory, SalaryComponent, SalaryStructure};
pub use tax::{TaxRegime, TaxSlab};
