//! Salary computation.
//!
//! This module prorates the base salary and structure components by the
//! employee's effective days, adds overtime pay and deducts unpaid leave.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{ComponentProration, EngineConfig};
use crate::models::{AuditStep, ComponentLine, PayPeriod, SalaryStructure};

use super::round_money;

/// Day and hour figures feeding the salary computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryInputs {
    /// Working days from attendance (`presents + 0.5 * half_days`).
    pub working_days: Decimal,
    /// Paid leave days from reconciliation.
    pub paid_leave_days: Decimal,
    /// Unpaid leave days from reconciliation.
    pub unpaid_days: Decimal,
    /// HR-approved overtime hours.
    pub overtime_hours: Decimal,
}

impl SalaryInputs {
    /// `working_days + paid_leave_days - unpaid_days`.
    ///
    /// The result is not floored; it may be fractional or negative.
    pub fn effective_days(&self) -> Decimal {
        self.working_days + self.paid_leave_days - self.unpaid_days
    }
}

/// The result of computing one employee's salary for a pay period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryComputation {
    /// Calendar days in the pay period.
    pub total_days_in_month: u32,
    /// The proration basis.
    pub effective_days: Decimal,
    /// Prorated base salary.
    pub base_earnings: Decimal,
    /// Component breakdown in structure order.
    pub component_lines: Vec<ComponentLine>,
    /// Overtime pay.
    pub overtime_pay: Decimal,
    /// Deduction for unpaid leave days.
    pub unpaid_leave_deduction: Decimal,
    /// Gross earnings.
    pub earnings: Decimal,
    /// Gross deductions, excluding tax.
    pub deductions: Decimal,
    /// The audit steps recording the computation.
    pub audit_steps: Vec<AuditStep>,
}

/// Computes earnings and deductions for a pay period.
///
/// - `base_earnings = round(base_salary / days_in_month * effective_days, 2)`
/// - every active component shows `round(monthly_value / days_in_month * effective_days, 2)`
///   where the monthly value is the fixed amount or `percentage / 100 * base_salary`
/// - under [`ComponentProration::AppliedFull`] totals receive `percentage / 100 * base_salary`
///   for every component, so a custom line without a percentage adds nothing; under
///   [`ComponentProration::Prorated`] totals receive the displayed figure
/// - `overtime_pay = round(base_salary / standard_monthly_hours * overtime_hours, 2)`
/// - `unpaid_leave_deduction = round(earnings / days_in_month * unpaid_days, 2)`, computed
///   from earnings after components and overtime
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::{compute_salary, SalaryInputs};
/// use payroll_engine::config::EngineConfig;
/// use payroll_engine::models::{PayPeriod, SalaryStructure};
/// use rust_decimal::Decimal;
///
/// let structure = SalaryStructure {
///     id: 1,
///     employee_id: 7,
///     base_salary: Decimal::from(30000),
///     is_active: true,
///     components: vec![],
/// };
/// let inputs = SalaryInputs {
///     working_days: Decimal::from(30),
///     paid_leave_days: Decimal::ZERO,
///     unpaid_days: Decimal::ZERO,
///     overtime_hours: Decimal::ZERO,
/// };
/// let period = PayPeriod::new(2025, 11).unwrap();
///
/// let result = compute_salary(&structure, &inputs, period, &EngineConfig::default(), 1);
/// assert_eq!(result.earnings, Decimal::from(30000));
/// ```
pub fn compute_salary(
    structure: &SalaryStructure,
    inputs: &SalaryInputs,
    period: PayPeriod,
    config: &EngineConfig,
    step_number: u32,
) -> SalaryComputation {
    let mut step = step_number;
    let mut audit_steps = Vec::new();

    let total_days_in_month = period.days_in_month();
    let days = Decimal::from(total_days_in_month);
    let effective_days = inputs.effective_days();
    let base_salary = structure.base_salary;

    let base_earnings = round_money(base_salary / days * effective_days);
    audit_steps.push(AuditStep {
        step_number: step,
        rule_id: "base_salary_proration".to_string(),
        rule_name: "Base Salary Proration".to_string(),
        input: serde_json::json!({
            "base_salary": base_salary.to_string(),
            "days_in_month": total_days_in_month,
            "working_days": inputs.working_days.normalize().to_string(),
            "paid_leave_days": inputs.paid_leave_days.normalize().to_string(),
            "unpaid_days": inputs.unpaid_days.normalize().to_string()
        }),
        output: serde_json::json!({
            "effective_days": effective_days.normalize().to_string(),
            "base_earnings": base_earnings.to_string()
        }),
        reasoning: format!(
            "{} / {} days x {} effective days = {}",
            base_salary,
            total_days_in_month,
            effective_days.normalize(),
            base_earnings
        ),
    });
    step += 1;

    let mut earnings = base_earnings;
    let mut deductions = Decimal::ZERO;
    let mut component_lines = Vec::new();

    for component in structure.active_components() {
        let monthly_value = component.basis.display_value(base_salary);
        let displayed = round_money(monthly_value / days * effective_days);
        let applied = match config.component_proration {
            ComponentProration::AppliedFull => {
                round_money(component.basis.percentage_value(base_salary))
            }
            ComponentProration::Prorated => displayed,
        };

        if component.category.is_earning() {
            earnings += applied;
        } else {
            deductions += applied;
        }

        component_lines.push(ComponentLine {
            name: component.name.clone(),
            category: component.category,
            is_custom: component.basis.is_custom(),
            amount: displayed,
            applied_amount: applied,
        });
    }

    if !component_lines.is_empty() {
        let lines_json: Vec<serde_json::Value> = component_lines
            .iter()
            .map(|line| {
                serde_json::json!({
                    "name": line.name,
                    "category": line.category,
                    "amount": line.amount.to_string(),
                    "applied_amount": line.applied_amount.to_string()
                })
            })
            .collect();
        audit_steps.push(AuditStep {
            step_number: step,
            rule_id: "salary_components".to_string(),
            rule_name: "Salary Components".to_string(),
            input: serde_json::json!({
                "components": component_lines.len(),
                "proration": config.component_proration
            }),
            output: serde_json::json!({ "lines": lines_json }),
            reasoning: match config.component_proration {
                ComponentProration::AppliedFull => {
                    "Components displayed prorated, applied at full monthly value".to_string()
                }
                ComponentProration::Prorated => {
                    "Components displayed and applied at prorated value".to_string()
                }
            },
        });
        step += 1;
    }

    let overtime_pay = if config.standard_monthly_hours.is_zero() {
        Decimal::ZERO
    } else {
        round_money(base_salary / config.standard_monthly_hours * inputs.overtime_hours)
    };
    earnings += overtime_pay;
    audit_steps.push(AuditStep {
        step_number: step,
        rule_id: "overtime_pay".to_string(),
        rule_name: "Overtime Pay".to_string(),
        input: serde_json::json!({
            "base_salary": base_salary.to_string(),
            "standard_monthly_hours": config.standard_monthly_hours.normalize().to_string(),
            "overtime_hours": inputs.overtime_hours.normalize().to_string()
        }),
        output: serde_json::json!({ "overtime_pay": overtime_pay.to_string() }),
        reasoning: format!(
            "{} / {} hours x {} overtime hours = {}",
            base_salary,
            config.standard_monthly_hours.normalize(),
            inputs.overtime_hours.normalize(),
            overtime_pay
        ),
    });
    step += 1;

    let unpaid_leave_deduction = if inputs.unpaid_days > Decimal::ZERO {
        round_money(earnings / days * inputs.unpaid_days)
    } else {
        Decimal::ZERO
    };
    if inputs.unpaid_days > Decimal::ZERO {
        deductions += unpaid_leave_deduction;
        audit_steps.push(AuditStep {
            step_number: step,
            rule_id: "unpaid_leave_deduction".to_string(),
            rule_name: "Unpaid Leave Deduction".to_string(),
            input: serde_json::json!({
                "earnings": earnings.to_string(),
                "days_in_month": total_days_in_month,
                "unpaid_days": inputs.unpaid_days.normalize().to_string()
            }),
            output: serde_json::json!({
                "unpaid_leave_deduction": unpaid_leave_deduction.to_string()
            }),
            reasoning: format!(
                "{} / {} days x {} unpaid days = {}",
                earnings,
                total_days_in_month,
                inputs.unpaid_days.normalize(),
                unpaid_leave_deduction
            ),
        });
    }

    SalaryComputation {
        total_days_in_month,
        effective_days,
        base_earnings,
        component_lines,
        overtime_pay,
        unpaid_leave_deduction,
        earnings,
        deductions,
        audit_steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ComponentBasis, ComponentCategory, SalaryComponent};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn november() -> PayPeriod {
        PayPeriod::new(2025, 11).unwrap()
    }

    fn percent(name: &str, category: ComponentCategory, pct: &str) -> SalaryComponent {
        SalaryComponent {
            name: name.to_string(),
            category,
            basis: ComponentBasis::PercentOfBase {
                percentage: dec(pct),
            },
            is_active: true,
        }
    }

    fn fixed(
        name: &str,
        category: ComponentCategory,
        amount: &str,
        pct: Option<&str>,
    ) -> SalaryComponent {
        SalaryComponent {
            name: name.to_string(),
            category,
            basis: ComponentBasis::Fixed {
                amount: dec(amount),
                percentage: pct.map(dec),
            },
            is_active: true,
        }
    }

    fn structure(base: &str, components: Vec<SalaryComponent>) -> SalaryStructure {
        SalaryStructure {
            id: 1,
            employee_id: 7,
            base_salary: dec(base),
            is_active: true,
            components,
        }
    }

    fn inputs(working: &str, paid: &str, unpaid: &str, overtime: &str) -> SalaryInputs {
        SalaryInputs {
            working_days: dec(working),
            paid_leave_days: dec(paid),
            unpaid_days: dec(unpaid),
            overtime_hours: dec(overtime),
        }
    }

    #[test]
    fn test_full_month_earns_full_base() {
        let result = compute_salary(
            &structure("30000", vec![]),
            &inputs("30", "0", "0", "0"),
            november(),
            &EngineConfig::default(),
            1,
        );

        assert_eq!(result.total_days_in_month, 30);
        assert_eq!(result.base_earnings, dec("30000.00"));
        assert_eq!(result.earnings, dec("30000.00"));
        assert_eq!(result.deductions, dec("0"));
    }

    #[test]
    fn test_zero_working_days_yields_zero_earnings() {
        let result = compute_salary(
            &structure("30000", vec![]),
            &inputs("0", "0", "0", "0"),
            november(),
            &EngineConfig::default(),
            1,
        );

        assert_eq!(result.base_earnings, dec("0"));
        assert_eq!(result.overtime_pay, dec("0"));
        assert_eq!(result.earnings, dec("0"));
    }

    #[test]
    fn test_half_days_prorate_fractionally() {
        // 20 present + 3 half days = 21.5 working days
        let result = compute_salary(
            &structure("30000", vec![]),
            &inputs("21.5", "2", "0", "0"),
            november(),
            &EngineConfig::default(),
            1,
        );

        assert_eq!(result.effective_days, dec("23.5"));
        assert_eq!(result.base_earnings, dec("23500.00"));
    }

    #[test]
    fn test_applied_full_components_differ_from_display() {
        let components = vec![
            percent("HRA", ComponentCategory::Earning, "40"),
            percent("PF", ComponentCategory::Deduction, "12"),
        ];
        let result = compute_salary(
            &structure("30000", components),
            &inputs("15", "0", "0", "0"),
            november(),
            &EngineConfig::default(),
            1,
        );

        let hra = &result.component_lines[0];
        assert_eq!(hra.amount, dec("6000.00"));
        assert_eq!(hra.applied_amount, dec("12000.00"));

        let pf = &result.component_lines[1];
        assert_eq!(pf.amount, dec("1800.00"));
        assert_eq!(pf.applied_amount, dec("3600.00"));

        assert_eq!(result.earnings, dec("27000.00"));
        assert_eq!(result.deductions, dec("3600.00"));
    }

    #[test]
    fn test_prorated_mode_applies_displayed_figure() {
        let components = vec![
            percent("HRA", ComponentCategory::Earning, "40"),
            percent("PF", ComponentCategory::Deduction, "12"),
        ];
        let config = EngineConfig {
            component_proration: ComponentProration::Prorated,
            ..EngineConfig::default()
        };
        let result = compute_salary(
            &structure("30000", components),
            &inputs("15", "0", "0", "0"),
            november(),
            &config,
            1,
        );

        assert_eq!(result.component_lines[0].applied_amount, dec("6000.00"));
        assert_eq!(result.earnings, dec("21000.00"));
        assert_eq!(result.deductions, dec("1800.00"));
    }

    #[test]
    fn test_custom_component_without_percentage_applies_nothing() {
        let components = vec![fixed("Meal card", ComponentCategory::Benefit, "3000", None)];
        let result = compute_salary(
            &structure("30000", components),
            &inputs("10", "0", "0", "0"),
            november(),
            &EngineConfig::default(),
            1,
        );

        let line = &result.component_lines[0];
        assert!(line.is_custom);
        assert_eq!(line.amount, dec("1000.00"));
        assert_eq!(line.applied_amount, dec("0.00"));
        assert_eq!(result.earnings, dec("10000.00"));
    }

    #[test]
    fn test_custom_component_applies_its_percentage_of_base() {
        let components = vec![fixed(
            "Meal card",
            ComponentCategory::Benefit,
            "1500",
            Some("5"),
        )];
        let result = compute_salary(
            &structure("30000", components),
            &inputs("22", "0", "0", "0"),
            november(),
            &EngineConfig::default(),
            1,
        );

        let line = &result.component_lines[0];
        assert_eq!(line.amount, dec("1100.00"));
        assert_eq!(line.applied_amount, dec("1500.00"));
        // Benefits route into earnings
        assert_eq!(result.earnings, dec("23500.00"));
    }

    #[test]
    fn test_prorated_mode_applies_displayed_custom_amount() {
        let components = vec![fixed("Meal card", ComponentCategory::Benefit, "3000", None)];
        let config = EngineConfig {
            component_proration: ComponentProration::Prorated,
            ..EngineConfig::default()
        };
        let result = compute_salary(
            &structure("30000", components),
            &inputs("10", "0", "0", "0"),
            november(),
            &config,
            1,
        );

        assert_eq!(result.component_lines[0].applied_amount, dec("1000.00"));
        assert_eq!(result.earnings, dec("11000.00"));
    }

    #[test]
    fn test_inactive_component_ignored() {
        let mut inactive = percent("HRA", ComponentCategory::Earning, "40");
        inactive.is_active = false;
        let result = compute_salary(
            &structure("30000", vec![inactive]),
            &inputs("30", "0", "0", "0"),
            november(),
            &EngineConfig::default(),
            1,
        );

        assert!(result.component_lines.is_empty());
        assert_eq!(result.earnings, dec("30000.00"));
    }

    #[test]
    fn test_overtime_pay_uses_standard_hours() {
        let result = compute_salary(
            &structure("32000", vec![]),
            &inputs("30", "0", "0", "5"),
            november(),
            &EngineConfig::default(),
            1,
        );

        // 32000 / 160 * 5
        assert_eq!(result.overtime_pay, dec("1000.00"));
        assert_eq!(result.earnings, dec("33000.00"));
    }

    #[test]
    fn test_overtime_divisor_is_configurable() {
        let config = EngineConfig {
            standard_monthly_hours: dec("200"),
            ..EngineConfig::default()
        };
        let result = compute_salary(
            &structure("32000", vec![]),
            &inputs("30", "0", "0", "5"),
            november(),
            &config,
            1,
        );

        assert_eq!(result.overtime_pay, dec("800.00"));
    }

    #[test]
    fn test_unpaid_deduction_uses_accumulated_earnings() {
        let components = vec![percent("HRA", ComponentCategory::Earning, "10")];
        let result = compute_salary(
            &structure("30000", components),
            &inputs("28", "0", "2", "0"),
            november(),
            &EngineConfig::default(),
            1,
        );

        // effective 26 days: base 26000 + HRA applied 3000 = 29000
        // deduction 29000 / 30 * 2 = 1933.333.. -> 1933.33
        assert_eq!(result.effective_days, dec("26"));
        assert_eq!(result.earnings, dec("29000.00"));
        assert_eq!(result.unpaid_leave_deduction, dec("1933.33"));
        assert_eq!(result.deductions, dec("1933.33"));
    }

    #[test]
    fn test_no_unpaid_days_no_deduction_step() {
        let result = compute_salary(
            &structure("30000", vec![]),
            &inputs("30", "0", "0", "0"),
            november(),
            &EngineConfig::default(),
            1,
        );

        assert_eq!(result.unpaid_leave_deduction, dec("0"));
        assert!(
            !result
                .audit_steps
                .iter()
                .any(|s| s.rule_id == "unpaid_leave_deduction")
        );
    }

    #[test]
    fn test_effective_days_not_floored() {
        let result = compute_salary(
            &structure("30000", vec![]),
            &inputs("0", "0", "3", "0"),
            november(),
            &EngineConfig::default(),
            1,
        );

        assert_eq!(result.effective_days, dec("-3"));
        assert_eq!(result.base_earnings, dec("-3000.00"));
    }

    #[test]
    fn test_audit_steps_are_numbered_sequentially() {
        let components = vec![percent("HRA", ComponentCategory::Earning, "40")];
        let result = compute_salary(
            &structure("30000", components),
            &inputs("28", "0", "2", "1"),
            november(),
            &EngineConfig::default(),
            3,
        );

        let numbers: Vec<u32> = result.audit_steps.iter().map(|s| s.step_number).collect();
        assert_eq!(numbers, vec![3, 4, 5, 6]);
    }
}
