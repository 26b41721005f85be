//! Monthly payroll generation engine
//!
//! This crate turns an employee's attendance, leave, overtime and salary
//! structure records for one calendar month into a committed payroll record
//! and a payslip: prorated earnings, deductions, progressive slab tax and net
//! pay, with an audit trace of every step.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod payroll;
