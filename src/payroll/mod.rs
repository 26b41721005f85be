//! Payroll assembly: input access, persistence, payslips and orchestration.
//!
//! [`PayrollGenerator`] ties the calculation modules to a
//! [`PayrollDataSource`], a [`PayrollStore`] and a [`PayslipWriter`].

mod generator;
mod payslip;
mod source;
mod store;

pub use generator::{GeneratedPayroll, GenerationRequest, PayrollGenerator};
pub use payslip::{
    FsPayslipWriter, PayslipAttendance, PayslipDocument, PayslipEmployee, PayslipLeave,
    PayslipTax, PayslipTotals, PayslipWriter, render_payslip_text,
};
pub use source::{InMemoryDirectory, PayrollDataSource};
pub use store::{InMemoryPayrollStore, PayrollStore};
