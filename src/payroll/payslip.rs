//! Payslip documents and their artifacts.
//!
//! A [`PayslipDocument`] is the machine-readable payslip. The printable
//! rendition is produced from the document alone by its `Display`
//! implementation, so both report the same figures.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::{LeaveAllocation, SlabTax};
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditTrace, ComponentCategory, ComponentLine, PayPeriod, TaxRegime};

/// Identity block of a payslip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayslipEmployee {
    /// Employee id.
    pub id: u64,
    /// Organization id.
    pub organization_id: u64,
    /// Display name.
    pub name: String,
    /// Employee code, or the numeric id when none is set.
    pub code: String,
    /// Department name.
    pub department: Option<String>,
}

/// Attendance block of a payslip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayslipAttendance {
    /// Days present.
    pub present_days: u32,
    /// Half days.
    pub half_days: u32,
    /// Days absent.
    pub absent_days: u32,
    /// `present_days + 0.5 * half_days`.
    pub working_days: Decimal,
    /// HR-approved overtime hours.
    pub overtime_hours: Decimal,
}

/// Leave block of a payslip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayslipLeave {
    /// Days paid from policy quota.
    pub paid_leave_days: Decimal,
    /// Days not covered by quota.
    pub unpaid_leave_days: Decimal,
    /// One entry per approved leave overlapping the month.
    pub allocations: Vec<LeaveAllocation>,
}

/// Money totals of a payslip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayslipTotals {
    /// Prorated base salary.
    pub base_earnings: Decimal,
    /// Overtime pay.
    pub overtime_amount: Decimal,
    /// Unpaid leave deduction.
    pub unpaid_leave_deduction: Decimal,
    /// Gross earnings.
    pub gross_earnings: Decimal,
    /// Gross deductions, excluding tax.
    pub gross_deductions: Decimal,
    /// Monthly tax.
    pub tax_deducted: Decimal,
    /// Net pay.
    pub net_salary: Decimal,
}

/// Tax block of a payslip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayslipTax {
    /// Regime applied.
    pub regime: TaxRegime,
    /// Annualized gross earnings.
    pub annual_income: Decimal,
    /// Annual tax before the monthly split.
    pub annual_tax: Decimal,
    /// Per-slab contributions.
    pub slabs: Vec<SlabTax>,
}

/// The structured payslip for one employee and one pay period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayslipDocument {
    /// Unique id of this payslip.
    pub payslip_id: Uuid,
    /// The payroll record the payslip renders.
    pub payroll_id: Uuid,
    /// When the payslip was generated.
    pub generated_at: DateTime<Utc>,
    /// Version of the engine that produced it.
    pub engine_version: String,
    /// Who was paid.
    pub employee: PayslipEmployee,
    /// The month paid.
    pub pay_period: PayPeriod,
    /// Attendance figures.
    pub attendance: PayslipAttendance,
    /// Leave figures.
    pub leave: PayslipLeave,
    /// Component lines in structure order.
    pub components: Vec<ComponentLine>,
    /// Money totals.
    pub totals: PayslipTotals,
    /// Tax breakdown.
    pub tax: PayslipTax,
    /// How every figure was reached.
    pub audit_trace: AuditTrace,
}

impl PayslipDocument {
    /// The artifact key `{employee_id}_{pay_period}`.
    pub fn key(&self) -> String {
        crate::models::payslip_key(self.employee.id, self.pay_period)
    }
}

const RULE: &str = "------------------------------------------------------------";

fn money_line(f: &mut fmt::Formatter<'_>, label: &str, amount: Decimal) -> fmt::Result {
    writeln!(f, "{:<40}{:>20}", format!("{}:", label), amount.to_string())
}

// The applied figure is the one summed into the gross totals; it is printed
// last whenever it differs from the prorated breakdown figure.
fn component_line(f: &mut fmt::Formatter<'_>, label: &str, line: &ComponentLine) -> fmt::Result {
    if line.applied_amount == line.amount {
        return money_line(f, label, line.amount);
    }
    writeln!(
        f,
        "{:<40}{:>20}  applied {}",
        format!("{}:", label),
        line.amount.to_string(),
        line.applied_amount
    )
}

impl fmt::Display for PayslipDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PAYSLIP {}", self.pay_period)?;
        writeln!(f, "{}", RULE)?;
        writeln!(f, "Employee: {} ({})", self.employee.name, self.employee.code)?;
        if let Some(department) = &self.employee.department {
            writeln!(f, "Department: {}", department)?;
        }
        writeln!(f, "Payslip ID: {}", self.payslip_id)?;
        writeln!(f, "Generated: {}", self.generated_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
        writeln!(f, "{}", RULE)?;

        writeln!(f, "ATTENDANCE")?;
        writeln!(
            f,
            "Present {}  Half days {}  Absent {}  Working days {}",
            self.attendance.present_days,
            self.attendance.half_days,
            self.attendance.absent_days,
            self.attendance.working_days.normalize()
        )?;
        writeln!(
            f,
            "Paid leave {}  Unpaid leave {}  Overtime hours {}",
            self.leave.paid_leave_days.normalize(),
            self.leave.unpaid_leave_days.normalize(),
            self.attendance.overtime_hours.normalize()
        )?;
        writeln!(f, "{}", RULE)?;

        writeln!(f, "EARNINGS")?;
        money_line(f, "Base salary", self.totals.base_earnings)?;
        for line in self.components.iter().filter(|l| l.category.is_earning()) {
            let label = match line.category {
                ComponentCategory::Benefit => format!("{} (benefit)", line.name),
                ComponentCategory::Earning | ComponentCategory::Deduction => line.name.clone(),
            };
            component_line(f, &label, line)?;
        }
        money_line(f, "Overtime", self.totals.overtime_amount)?;

        writeln!(f, "DEDUCTIONS")?;
        for line in self.components.iter().filter(|l| !l.category.is_earning()) {
            component_line(f, &line.name, line)?;
        }
        money_line(f, "Unpaid leave", self.totals.unpaid_leave_deduction)?;
        money_line(f, "Tax", self.totals.tax_deducted)?;
        writeln!(f, "{}", RULE)?;

        money_line(f, "Gross Earnings", self.totals.gross_earnings)?;
        money_line(f, "Gross Deductions", self.totals.gross_deductions)?;
        money_line(f, "Tax Deducted", self.totals.tax_deducted)?;
        money_line(f, "Net Salary", self.totals.net_salary)?;
        writeln!(f, "{}", RULE)?;
        write!(f, "Tax regime: {}", self.tax.regime)
    }
}

/// Renders the printable payslip from the structured document.
pub fn render_payslip_text(document: &PayslipDocument) -> String {
    document.to_string()
}

/// Writes payslip artifacts to durable storage.
pub trait PayslipWriter: Send + Sync {
    /// Writes both renditions and returns the link recorded on the payroll.
    fn write(&self, document: &PayslipDocument) -> EngineResult<String>;
}

/// Writes `{key}.json` and `{key}.txt` under a directory.
///
/// Each file is written to a temporary file in the same directory and then
/// renamed into place, so a reader never sees a partial payslip.
#[derive(Debug, Clone)]
pub struct FsPayslipWriter {
    dir: PathBuf,
}

impl FsPayslipWriter {
    /// Creates a writer rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl PayslipWriter for FsPayslipWriter {
    fn write(&self, document: &PayslipDocument) -> EngineResult<String> {
        let key = document.key();
        let json_path = self.dir.join(format!("{}.json", key));
        let text_path = self.dir.join(format!("{}.txt", key));

        fs::create_dir_all(&self.dir).map_err(|e| write_error(&self.dir, e))?;

        let json =
            serde_json::to_vec_pretty(document).map_err(|e| write_error(&json_path, e))?;
        atomic_write(&self.dir, &json_path, &json)?;
        atomic_write(
            &self.dir,
            &text_path,
            render_payslip_text(document).as_bytes(),
        )?;

        Ok(json_path.display().to_string())
    }
}

fn write_error(path: &Path, error: impl fmt::Display) -> EngineError {
    EngineError::PayslipWrite {
        path: path.display().to_string(),
        message: error.to_string(),
    }
}

fn atomic_write(dir: &Path, final_path: &Path, bytes: &[u8]) -> EngineResult<()> {
    let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(|e| write_error(final_path, e))?;
    temp.as_file_mut()
        .write_all(bytes)
        .map_err(|e| write_error(final_path, e))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| write_error(final_path, e))?;
    temp.persist(final_path)
        .map_err(|e| write_error(final_path, e.error))?;
    Ok(())
}
