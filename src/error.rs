//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during payroll generation.

use thiserror::Error;

use crate::models::PayPeriod;

/// The main error type for the payroll engine.
///
/// Every variant maps to a stable machine-readable reason via
/// [`EngineError::reason`], which callers can rely on across releases.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::EmployeeNotFound { employee_id: 7 };
/// assert_eq!(error.to_string(), "Employee not found: 7");
/// assert_eq!(error.reason(), "EMPLOYEE_NOT_FOUND");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The employee does not exist in the data source.
    #[error("Employee not found: {employee_id}")]
    EmployeeNotFound {
        /// The requested employee id.
        employee_id: u64,
    },

    /// The employee has no active salary structure.
    #[error("No active salary structure for employee {employee_id}")]
    NoActiveSalaryStructure {
        /// The employee id.
        employee_id: u64,
    },

    /// The employee has more than one active salary structure.
    #[error("Employee {employee_id} has {count} active salary structures, expected exactly one")]
    MultipleActiveSalaryStructures {
        /// The employee id.
        employee_id: u64,
        /// How many active structures were found.
        count: usize,
    },

    /// A payroll record already exists for the employee and period.
    #[error("Payroll already exists for employee {employee_id} in {pay_period}")]
    PayrollAlreadyExists {
        /// The employee id.
        employee_id: u64,
        /// The conflicting pay period.
        pay_period: PayPeriod,
    },

    /// No payroll record exists for the employee and period.
    #[error("No payroll for employee {employee_id} in {pay_period}")]
    PayrollNotFound {
        /// The employee id.
        employee_id: u64,
        /// The requested pay period.
        pay_period: PayPeriod,
    },

    /// A pay period string could not be parsed.
    #[error("Invalid pay period '{value}': {message}")]
    InvalidPayPeriod {
        /// The rejected input.
        value: String,
        /// A description of what was wrong.
        message: String,
    },

    /// The payroll store failed unexpectedly.
    #[error("Storage error: {message}")]
    Storage {
        /// A description of the failure.
        message: String,
    },

    /// A payslip artifact could not be written.
    #[error("Failed to write payslip '{path}': {message}")]
    PayslipWrite {
        /// The artifact path.
        path: String,
        /// A description of the failure.
        message: String,
    },
}

impl EngineError {
    /// Returns the stable machine-readable reason for this error.
    pub fn reason(&self) -> &'static str {
        match self {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                "CONFIG_ERROR"
            }
            EngineError::EmployeeNotFound { .. } => "EMPLOYEE_NOT_FOUND",
            EngineError::NoActiveSalaryStructure { .. } => "NO_ACTIVE_SALARY_STRUCTURE",
            EngineError::MultipleActiveSalaryStructures { .. } => "AMBIGUOUS_SALARY_STRUCTURE",
            EngineError::PayrollAlreadyExists { .. } => "PAYROLL_EXISTS",
            EngineError::PayrollNotFound { .. } => "PAYROLL_NOT_FOUND",
            EngineError::InvalidPayPeriod { .. } => "INVALID_PAY_PERIOD",
            EngineError::Storage { .. } => "STORAGE_ERROR",
            EngineError::PayslipWrite { .. } => "PAYSLIP_WRITE_FAILED",
        }
    }

    /// Returns true for errors that abort generation before anything is persisted.
    pub fn is_precondition_failure(&self) -> bool {
        matches!(
            self,
            EngineError::EmployeeNotFound { .. }
                | EngineError::NoActiveSalaryStructure { .. }
                | EngineError::MultipleActiveSalaryStructures { .. }
        )
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn november() -> PayPeriod {
        PayPeriod::new(2025, 11).unwrap()
    }

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/engine.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/engine.yaml"
        );
        assert_eq!(error.reason(), "CONFIG_ERROR");
    }

    #[test]
    fn test_payroll_already_exists_displays_key() {
        let error = EngineError::PayrollAlreadyExists {
            employee_id: 7,
            pay_period: november(),
        };
        assert_eq!(
            error.to_string(),
            "Payroll already exists for employee 7 in 2025-11"
        );
        assert_eq!(error.reason(), "PAYROLL_EXISTS");
    }

    #[test]
    fn test_no_active_salary_structure_is_precondition() {
        let error = EngineError::NoActiveSalaryStructure { employee_id: 3 };
        assert!(error.is_precondition_failure());
        assert_eq!(error.reason(), "NO_ACTIVE_SALARY_STRUCTURE");
    }

    #[test]
    fn test_conflict_is_not_precondition() {
        let error = EngineError::PayrollAlreadyExists {
            employee_id: 7,
            pay_period: november(),
        };
        assert!(!error.is_precondition_failure());
    }

    #[test]
    fn test_invalid_pay_period_displays_value_and_message() {
        let error = EngineError::InvalidPayPeriod {
            value: "13-2025".to_string(),
            message: "month must be between 1 and 12".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid pay period '13-2025': month must be between 1 and 12"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_not_found() -> EngineResult<()> {
            Err(EngineError::EmployeeNotFound { employee_id: 1 })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_not_found()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
