//! Employee model.
//!
//! Employees are owned by the HR management side of the system; the payroll
//! engine only reads their identity and tenant.

use serde::{Deserialize, Serialize};

/// Represents an employee whose payroll is being generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: u64,
    /// The organization (tenant) the employee belongs to.
    pub organization_id: u64,
    /// Display name printed on the payslip.
    pub name: String,
    /// Optional HR reference code (e.g. "EMP-0007").
    #[serde(default)]
    pub employee_code: Option<String>,
    /// Optional department name printed on the payslip.
    #[serde(default)]
    pub department: Option<String>,
}

impl Employee {
    /// Returns the code printed on payslips, falling back to the numeric id.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::Employee;
    ///
    /// let employee = Employee {
    ///     id: 7,
    ///     organization_id: 1,
    ///     name: "Asha Rao".to_string(),
    ///     employee_code: None,
    ///     department: None,
    /// };
    /// assert_eq!(employee.display_code(), "7");
    /// ```
    pub fn display_code(&self) -> String {
        self.employee_code
            .clone()
            .unwrap_or_else(|| self.id.to_string())
    }
}
