//! Payroll generation for one employee and one month.
//!
//! The generator runs the attendance aggregator and the leave reconciler over
//! the same month, feeds both into the salary computation, taxes the result,
//! commits the payroll record and finally writes the payslip artifacts.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::calculation::{
    AttendanceSummary, LeaveReconciliation, SalaryComputation, SalaryInputs, TaxComputation,
    aggregate_attendance, annualize, calculate_monthly_tax, compute_salary, reconcile_leave,
};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditTrace, Employee, PayPeriod, Payroll, SalaryStructure, TaxRegime,
};

use super::payslip::{
    PayslipAttendance, PayslipDocument, PayslipEmployee, PayslipLeave, PayslipTax, PayslipTotals,
    PayslipWriter,
};
use super::source::PayrollDataSource;
use super::store::PayrollStore;

/// What to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The employee to pay.
    pub employee_id: u64,
    /// The month to pay.
    pub pay_period: PayPeriod,
    /// Tax regime; the configured default when `None`.
    pub regime: Option<TaxRegime>,
}

/// The outcome of a successful generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedPayroll {
    /// The committed payroll record.
    pub payroll: Payroll,
    /// The structured payslip built from the record.
    pub payslip: PayslipDocument,
    /// Why the payslip artifacts could not be written, when they could not.
    pub payslip_error: Option<String>,
}

/// Generates and commits monthly payroll.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
///
/// use payroll_engine::config::ConfigLoader;
/// use payroll_engine::models::PayPeriod;
/// use payroll_engine::payroll::{
///     FsPayslipWriter, GenerationRequest, InMemoryDirectory, InMemoryPayrollStore,
///     PayrollGenerator,
/// };
///
/// let loader = ConfigLoader::load("./config/payroll")?;
/// let data = ConfigLoader::load_directory("./config/payroll/directory.yaml")?;
/// let generator = PayrollGenerator::new(
///     loader.config().clone(),
///     Arc::new(InMemoryDirectory::new(data)),
///     Arc::new(InMemoryPayrollStore::new()),
///     Arc::new(FsPayslipWriter::new("./payslips")),
/// );
///
/// let generated = generator.generate(&GenerationRequest {
///     employee_id: 7,
///     pay_period: PayPeriod::new(2025, 11)?,
///     regime: None,
/// })?;
/// println!("Net salary: {}", generated.payroll.net_salary);
/// # Ok::<(), payroll_engine::error::EngineError>(())
/// ```
#[derive(Clone)]
pub struct PayrollGenerator {
    config: EngineConfig,
    source: Arc<dyn PayrollDataSource>,
    store: Arc<dyn PayrollStore>,
    writer: Arc<dyn PayslipWriter>,
}

impl PayrollGenerator {
    /// Creates a generator over its collaborators.
    pub fn new(
        config: EngineConfig,
        source: Arc<dyn PayrollDataSource>,
        store: Arc<dyn PayrollStore>,
        writer: Arc<dyn PayslipWriter>,
    ) -> Self {
        Self {
            config,
            source,
            store,
            writer,
        }
    }

    /// The engine settings in use.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Looks up a committed payroll record.
    pub fn find(&self, employee_id: u64, pay_period: PayPeriod) -> EngineResult<Payroll> {
        self.store
            .find(employee_id, pay_period)?
            .ok_or(EngineError::PayrollNotFound {
                employee_id,
                pay_period,
            })
    }

    /// Lists an employee's committed payroll records, oldest period first.
    pub fn history(&self, employee_id: u64) -> EngineResult<Vec<Payroll>> {
        if self.source.employee(employee_id)?.is_none() {
            return Err(EngineError::EmployeeNotFound { employee_id });
        }
        self.store.list_for_employee(employee_id)
    }

    /// Generates payroll for one employee and month.
    ///
    /// Fails before any computation when a record already exists for the key,
    /// when the employee is unknown, or when the employee does not have
    /// exactly one active salary structure. A failed payslip write does not
    /// fail generation; it is reported in [`GeneratedPayroll::payslip_error`].
    pub fn generate(&self, request: &GenerationRequest) -> EngineResult<GeneratedPayroll> {
        let start_time = Instant::now();
        let employee_id = request.employee_id;
        let pay_period = request.pay_period;
        let regime = request.regime.unwrap_or(self.config.default_tax_regime);

        info!(
            employee_id,
            pay_period = %pay_period,
            regime = %regime,
            "Generating payroll"
        );

        if self.store.find(employee_id, pay_period)?.is_some() {
            warn!(employee_id, pay_period = %pay_period, "Payroll already exists");
            return Err(EngineError::PayrollAlreadyExists {
                employee_id,
                pay_period,
            });
        }

        let employee = self
            .source
            .employee(employee_id)?
            .ok_or(EngineError::EmployeeNotFound { employee_id })?;
        let structure = self.active_structure(employee_id)?;

        let mut step_number: u32 = 1;
        let mut audit_steps: Vec<AuditStep> = Vec::new();
        let mut warnings = Vec::new();

        let attendance = self.source.attendance(employee_id, pay_period)?;
        let overtime_requests = self.source.overtime_requests(employee_id)?;
        let summary = aggregate_attendance(&attendance, &overtime_requests, pay_period, step_number);
        audit_steps.push(summary.audit_step.clone());
        step_number += 1;

        let leaves = self.source.approved_leaves(employee_id)?;
        let policies = self.source.leave_policies(employee.organization_id)?;
        let reconciliation = reconcile_leave(&leaves, &policies, pay_period, step_number);
        audit_steps.push(reconciliation.audit_step.clone());
        warnings.extend(reconciliation.warnings.iter().cloned());
        step_number += 1;

        let inputs = SalaryInputs {
            working_days: summary.working_days,
            paid_leave_days: reconciliation.paid_leave_days,
            unpaid_days: reconciliation.unpaid_days,
            overtime_hours: summary.overtime_hours,
        };
        let salary = compute_salary(&structure, &inputs, pay_period, &self.config, step_number);
        step_number += salary.audit_steps.len() as u32;
        audit_steps.extend(salary.audit_steps.iter().cloned());

        let slabs = self.source.tax_slabs(employee.organization_id, regime)?;
        let tax = calculate_monthly_tax(annualize(salary.earnings), &slabs, regime, step_number);
        audit_steps.push(tax.audit_step.clone());
        warnings.extend(tax.warning.iter().cloned());
        step_number += 1;

        let net_salary = salary.earnings - (salary.deductions + tax.monthly_tax);
        audit_steps.push(AuditStep {
            step_number,
            rule_id: "net_salary".to_string(),
            rule_name: "Net Salary".to_string(),
            input: serde_json::json!({
                "gross_earnings": salary.earnings.to_string(),
                "gross_deductions": salary.deductions.to_string(),
                "tax_deducted": tax.monthly_tax.to_string()
            }),
            output: serde_json::json!({ "net_salary": net_salary.to_string() }),
            reasoning: format!(
                "{} - ({} + {}) = {}",
                salary.earnings, salary.deductions, tax.monthly_tax, net_salary
            ),
        });

        let mut payroll = build_payroll(&employee, pay_period, &summary, &reconciliation, &salary);
        payroll.tax_deducted = tax.monthly_tax;
        payroll.net_salary = net_salary;

        // Authoritative uniqueness guard; the find above only saves work.
        self.store.insert(payroll.clone()).inspect_err(|err| {
            warn!(
                employee_id,
                pay_period = %pay_period,
                error = %err,
                "Payroll insert rejected"
            );
        })?;

        let audit_trace = AuditTrace {
            steps: audit_steps,
            warnings,
            duration_us: start_time.elapsed().as_micros() as u64,
        };
        let payslip = assemble_payslip(
            &payroll,
            &employee,
            &reconciliation,
            &salary,
            &tax,
            audit_trace,
        );

        let payslip_error = match self.publish_payslip(&payslip) {
            Ok(link) => {
                payroll.payslip_link = Some(link);
                None
            }
            Err(err) => {
                warn!(
                    employee_id,
                    pay_period = %pay_period,
                    error = %err,
                    "Payslip artifact not written; payroll remains committed"
                );
                Some(err.to_string())
            }
        };

        info!(
            employee_id,
            pay_period = %pay_period,
            gross_earnings = %payroll.gross_earnings,
            tax_deducted = %payroll.tax_deducted,
            net_salary = %payroll.net_salary,
            duration_us = start_time.elapsed().as_micros() as u64,
            "Payroll generated"
        );

        Ok(GeneratedPayroll {
            payroll,
            payslip,
            payslip_error,
        })
    }

    fn active_structure(&self, employee_id: u64) -> EngineResult<SalaryStructure> {
        let mut structures = self.source.active_salary_structures(employee_id)?;
        match structures.len() {
            0 => Err(EngineError::NoActiveSalaryStructure { employee_id }),
            1 => Ok(structures.remove(0)),
            count => Err(EngineError::MultipleActiveSalaryStructures { employee_id, count }),
        }
    }

    fn publish_payslip(&self, payslip: &PayslipDocument) -> EngineResult<String> {
        let link = self.writer.write(payslip)?;
        self.store
            .attach_payslip_link(payslip.employee.id, payslip.pay_period, link.clone())?;
        debug!(link = %link, "Payslip written");
        Ok(link)
    }
}

fn build_payroll(
    employee: &Employee,
    pay_period: PayPeriod,
    summary: &AttendanceSummary,
    reconciliation: &LeaveReconciliation,
    salary: &SalaryComputation,
) -> Payroll {
    Payroll {
        id: Uuid::new_v4(),
        employee_id: employee.id,
        organization_id: employee.organization_id,
        pay_period,
        gross_earnings: salary.earnings,
        gross_deductions: salary.deductions,
        net_salary: Decimal::ZERO,
        working_days: summary.working_days,
        present_days: summary.presents,
        half_days: summary.half_days,
        absent_days: summary.absents,
        leave_days: reconciliation.total_leave_days(),
        paid_leave_days: reconciliation.paid_leave_days,
        unpaid_leave_days: reconciliation.unpaid_days,
        overtime_hours: summary.overtime_hours,
        overtime_amount: salary.overtime_pay,
        unpaid_leave_deduction: salary.unpaid_leave_deduction,
        tax_deducted: Decimal::ZERO,
        component_breakdown: salary.component_lines.clone(),
        payslip_link: None,
        created_at: Utc::now(),
    }
}

fn assemble_payslip(
    payroll: &Payroll,
    employee: &Employee,
    reconciliation: &LeaveReconciliation,
    salary: &SalaryComputation,
    tax: &TaxComputation,
    audit_trace: AuditTrace,
) -> PayslipDocument {
    PayslipDocument {
        payslip_id: Uuid::new_v4(),
        payroll_id: payroll.id,
        generated_at: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        employee: PayslipEmployee {
            id: employee.id,
            organization_id: employee.organization_id,
            name: employee.name.clone(),
            code: employee.display_code(),
            department: employee.department.clone(),
        },
        pay_period: payroll.pay_period,
        attendance: PayslipAttendance {
            present_days: payroll.present_days,
            half_days: payroll.half_days,
            absent_days: payroll.absent_days,
            working_days: payroll.working_days,
            overtime_hours: payroll.overtime_hours,
        },
        leave: PayslipLeave {
            paid_leave_days: payroll.paid_leave_days,
            unpaid_leave_days: payroll.unpaid_leave_days,
            allocations: reconciliation.allocations.clone(),
        },
        components: payroll.component_breakdown.clone(),
        totals: PayslipTotals {
            base_earnings: salary.base_earnings,
            overtime_amount: payroll.overtime_amount,
            unpaid_leave_deduction: payroll.unpaid_leave_deduction,
            gross_earnings: payroll.gross_earnings,
            gross_deductions: payroll.gross_deductions,
            tax_deducted: payroll.tax_deducted,
            net_salary: payroll.net_salary,
        },
        tax: PayslipTax {
            regime: tax.regime,
            annual_income: tax.annual_income,
            annual_tax: tax.annual_tax,
            slabs: tax.slabs.clone(),
        },
        audit_trace,
    }
}
