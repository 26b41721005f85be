//! Read-only access to the records payroll generation consumes.

use crate::config::DirectoryData;
use crate::error::EngineResult;
use crate::models::{
    AttendanceRecord, Employee, LeavePolicy, LeaveRecord, OvertimeRequest, PayPeriod,
    SalaryStructure, TaxRegime, TaxSlab,
};

/// The input contract between the payroll core and the HR system's records.
///
/// Implementations only read. Every method may fail with
/// [`EngineError::Storage`](crate::error::EngineError::Storage) when the
/// backing store is unavailable.
pub trait PayrollDataSource: Send + Sync {
    /// Looks up an employee by id.
    fn employee(&self, employee_id: u64) -> EngineResult<Option<Employee>>;

    /// Attendance rows for the employee dated inside the period.
    fn attendance(&self, employee_id: u64, period: PayPeriod)
    -> EngineResult<Vec<AttendanceRecord>>;

    /// Overtime requests filed by the employee, any status.
    fn overtime_requests(&self, employee_id: u64) -> EngineResult<Vec<OvertimeRequest>>;

    /// The employee's approved leave, all time.
    fn approved_leaves(&self, employee_id: u64) -> EngineResult<Vec<LeaveRecord>>;

    /// The organization's leave policies.
    fn leave_policies(&self, organization_id: u64) -> EngineResult<Vec<LeavePolicy>>;

    /// The employee's structures with `is_active` set.
    fn active_salary_structures(&self, employee_id: u64) -> EngineResult<Vec<SalaryStructure>>;

    /// The organization's slabs for one regime, in any order.
    fn tax_slabs(&self, organization_id: u64, regime: TaxRegime) -> EngineResult<Vec<TaxSlab>>;
}

/// A [`PayrollDataSource`] over an in-memory dataset.
///
/// # Example
///
/// ```
/// use payroll_engine::config::DirectoryData;
/// use payroll_engine::payroll::{InMemoryDirectory, PayrollDataSource};
///
/// let directory = InMemoryDirectory::new(DirectoryData::default());
/// assert!(directory.employee(7).unwrap().is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    data: DirectoryData,
}

impl InMemoryDirectory {
    /// Wraps a dataset.
    pub fn new(data: DirectoryData) -> Self {
        Self { data }
    }
}

impl PayrollDataSource for InMemoryDirectory {
    fn employee(&self, employee_id: u64) -> EngineResult<Option<Employee>> {
        Ok(self
            .data
            .employees
            .iter()
            .find(|e| e.id == employee_id)
            .cloned())
    }

    fn attendance(
        &self,
        employee_id: u64,
        period: PayPeriod,
    ) -> EngineResult<Vec<AttendanceRecord>> {
        Ok(self
            .data
            .attendance
            .iter()
            .filter(|r| r.employee_id == employee_id && period.contains_date(r.date))
            .cloned()
            .collect())
    }

    fn overtime_requests(&self, employee_id: u64) -> EngineResult<Vec<OvertimeRequest>> {
        Ok(self
            .data
            .overtime_requests
            .iter()
            .filter(|r| r.employee_id == employee_id)
            .cloned()
            .collect())
    }

    fn approved_leaves(&self, employee_id: u64) -> EngineResult<Vec<LeaveRecord>> {
        Ok(self
            .data
            .leaves
            .iter()
            .filter(|l| l.employee_id == employee_id && l.is_approved())
            .cloned()
            .collect())
    }

    fn leave_policies(&self, organization_id: u64) -> EngineResult<Vec<LeavePolicy>> {
        Ok(self
            .data
            .leave_policies
            .iter()
            .filter(|p| p.organization_id == organization_id)
            .cloned()
            .collect())
    }

    fn active_salary_structures(&self, employee_id: u64) -> EngineResult<Vec<SalaryStructure>> {
        Ok(self
            .data
            .salary_structures
            .iter()
            .filter(|s| s.employee_id == employee_id && s.is_active)
            .cloned()
            .collect())
    }

    fn tax_slabs(&self, organization_id: u64, regime: TaxRegime) -> EngineResult<Vec<TaxSlab>> {
        Ok(self
            .data
            .tax_slabs
            .iter()
            .filter(|s| s.organization_id == organization_id && s.regime == regime)
            .cloned()
            .collect())
    }
}
