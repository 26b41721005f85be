//! Salary structure models.
//!
//! A salary structure holds an employee's monthly base salary and the
//! earning, deduction and benefit components layered on top of it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The category a salary component is routed into.
///
/// Earnings and benefits add to gross earnings; deductions add to gross
/// deductions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentCategory {
    /// Adds to earnings (e.g. house rent allowance).
    Earning,
    /// Adds to deductions (e.g. provident fund).
    Deduction,
    /// Adds to earnings (e.g. meal benefit).
    Benefit,
}

impl ComponentCategory {
    /// Returns true if the category contributes to earnings.
    pub fn is_earning(self) -> bool {
        match self {
            ComponentCategory::Earning | ComponentCategory::Benefit => true,
            ComponentCategory::Deduction => false,
        }
    }
}

/// How a component's monthly figure is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "basis", rename_all = "snake_case")]
pub enum ComponentBasis {
    /// A custom fixed monthly amount.
    ///
    /// The amount drives the displayed breakdown only. What a custom line
    /// contributes to totals is still `percentage / 100 * base_salary`,
    /// which is zero when no percentage is recorded.
    Fixed {
        /// The monthly amount shown on the payslip.
        amount: Decimal,
        /// Percentage of base applied to totals, if any.
        #[serde(default)]
        percentage: Option<Decimal>,
    },
    /// A percentage of the base salary.
    PercentOfBase {
        /// The percentage, e.g. `40` for 40%.
        percentage: Decimal,
    },
}

impl ComponentBasis {
    /// Returns true for custom fixed-amount components.
    pub fn is_custom(&self) -> bool {
        matches!(self, ComponentBasis::Fixed { .. })
    }

    /// The monthly figure shown on the payslip breakdown before proration.
    pub fn display_value(&self, base_salary: Decimal) -> Decimal {
        match *self {
            ComponentBasis::Fixed { amount, .. } => amount,
            ComponentBasis::PercentOfBase { percentage } => {
                percentage / Decimal::ONE_HUNDRED * base_salary
            }
        }
    }

    /// The full monthly percentage-of-base figure.
    pub fn percentage_value(&self, base_salary: Decimal) -> Decimal {
        let percentage = match *self {
            ComponentBasis::Fixed { percentage, .. } => percentage.unwrap_or(Decimal::ZERO),
            ComponentBasis::PercentOfBase { percentage } => percentage,
        };
        percentage / Decimal::ONE_HUNDRED * base_salary
    }
}

/// One component line on a salary structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryComponent {
    /// Component name printed on the payslip (e.g. "HRA").
    pub name: String,
    /// Where the component is routed.
    pub category: ComponentCategory,
    /// How the amount is expressed.
    #[serde(flatten)]
    pub basis: ComponentBasis,
    /// Inactive components are ignored.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// An employee's salary structure.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{ComponentBasis, ComponentCategory, SalaryComponent, SalaryStructure};
/// use rust_decimal::Decimal;
///
/// let structure = SalaryStructure {
///     id: 1,
///     employee_id: 7,
///     base_salary: Decimal::from(30000),
///     is_active: true,
///     components: vec![SalaryComponent {
///         name: "HRA".to_string(),
///         category: ComponentCategory::Earning,
///         basis: ComponentBasis::PercentOfBase { percentage: Decimal::from(40) },
///         is_active: true,
///     }],
/// };
/// assert_eq!(structure.active_components().count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryStructure {
    /// Unique identifier of the structure.
    pub id: u64,
    /// The employee the structure belongs to.
    pub employee_id: u64,
    /// Monthly base salary.
    pub base_salary: Decimal,
    /// Whether this structure is the one in force.
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Component lines.
    #[serde(default)]
    pub components: Vec<SalaryComponent>,
}

impl SalaryStructure {
    /// Iterates over the active components in declaration order.
    pub fn active_components(&self) -> impl Iterator<Item = &SalaryComponent> {
        self.components.iter().filter(|c| c.is_active)
    }
}

fn default_active() -> bool {
    true
}
