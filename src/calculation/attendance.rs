//! Attendance aggregation.
//!
//! This module summarizes an employee's daily attendance for a pay period into
//! present, half-day and absent counts, and totals the HR-approved overtime
//! attached to days flagged as overtime.

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{AttendanceRecord, AttendanceStatus, AuditStep, OvertimeRequest, PayPeriod};

/// The attendance summary for one employee and one pay period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    /// Days with status `present`.
    pub presents: u32,
    /// Days with status `half_day`.
    pub half_days: u32,
    /// Days with status `absent`.
    pub absents: u32,
    /// HR-approved overtime hours on overtime-flagged days.
    pub overtime_hours: Decimal,
    /// `presents + 0.5 * half_days`.
    pub working_days: Decimal,
    /// The audit step recording this aggregation.
    pub audit_step: AuditStep,
}

/// Aggregates attendance records for a pay period.
///
/// Records dated outside the period are ignored. Overtime hours come from
/// requests whose `attendance_id` points at an in-period record flagged
/// `is_overtime` and whose status is HR-approved.
///
/// A period with no records yields zero working days; it is not an error.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::aggregate_attendance;
/// use payroll_engine::models::{AttendanceRecord, AttendanceStatus, PayPeriod};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let period = PayPeriod::new(2025, 11).unwrap();
/// let records = vec![
///     AttendanceRecord {
///         id: 1,
///         employee_id: 7,
///         date: NaiveDate::from_ymd_opt(2025, 11, 3).unwrap(),
///         status: AttendanceStatus::Present,
///         is_overtime: false,
///         total_work_hours: Decimal::from(8),
///     },
///     AttendanceRecord {
///         id: 2,
///         employee_id: 7,
///         date: NaiveDate::from_ymd_opt(2025, 11, 4).unwrap(),
///         status: AttendanceStatus::HalfDay,
///         is_overtime: false,
///         total_work_hours: Decimal::from(4),
///     },
/// ];
///
/// let summary = aggregate_attendance(&records, &[], period, 1);
/// assert_eq!(summary.working_days, Decimal::from_str("1.5").unwrap());
/// ```
pub fn aggregate_attendance(
    records: &[AttendanceRecord],
    overtime_requests: &[OvertimeRequest],
    period: PayPeriod,
    step_number: u32,
) -> AttendanceSummary {
    let in_period: Vec<&AttendanceRecord> = records
        .iter()
        .filter(|r| period.contains_date(r.date))
        .collect();

    let count = |status: AttendanceStatus| -> u32 {
        in_period.iter().filter(|r| r.status == status).count() as u32
    };
    let presents = count(AttendanceStatus::Present);
    let half_days = count(AttendanceStatus::HalfDay);
    let absents = count(AttendanceStatus::Absent);

    let overtime_days: HashSet<u64> = in_period
        .iter()
        .filter(|r| r.is_overtime)
        .map(|r| r.id)
        .collect();

    let payable: Vec<&OvertimeRequest> = overtime_requests
        .iter()
        .filter(|req| req.is_payable() && overtime_days.contains(&req.attendance_id))
        .collect();
    let overtime_hours: Decimal = payable.iter().map(|req| req.actual_overtime_hours).sum();

    let working_days = Decimal::from(presents) + Decimal::new(5, 1) * Decimal::from(half_days);

    let reasoning = if in_period.is_empty() {
        format!(
            "No attendance recorded in {}, working days are zero",
            period
        )
    } else {
        format!(
            "{} present + 0.5 x {} half days = {} working days; {} approved overtime hours from {} requests",
            presents,
            half_days,
            working_days.normalize(),
            overtime_hours.normalize(),
            payable.len()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "attendance_aggregation".to_string(),
        rule_name: "Attendance Aggregation".to_string(),
        input: serde_json::json!({
            "pay_period": period.to_string(),
            "records": in_period.len(),
            "overtime_requests": overtime_requests.len()
        }),
        output: serde_json::json!({
            "presents": presents,
            "half_days": half_days,
            "absents": absents,
            "working_days": working_days.normalize().to_string(),
            "overtime_hours": overtime_hours.normalize().to_string()
        }),
        reasoning,
    };

    AttendanceSummary {
        presents,
        half_days,
        absents,
        overtime_hours,
        working_days,
        audit_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OvertimeStatus;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn november() -> PayPeriod {
        PayPeriod::new(2025, 11).unwrap()
    }

    fn record(id: u64, day: u32, status: AttendanceStatus, is_overtime: bool) -> AttendanceRecord {
        AttendanceRecord {
            id,
            employee_id: 7,
            date: NaiveDate::from_ymd_opt(2025, 11, day).unwrap(),
            status,
            is_overtime,
            total_work_hours: dec("8"),
        }
    }

    fn overtime(id: u64, attendance_id: u64, hours: &str, status: OvertimeStatus) -> OvertimeRequest {
        OvertimeRequest {
            id,
            employee_id: 7,
            attendance_id,
            work_date: NaiveDate::from_ymd_opt(2025, 11, 3).unwrap(),
            actual_overtime_hours: dec(hours),
            status,
        }
    }

    #[test]
    fn test_counts_each_status() {
        let records = vec![
            record(1, 3, AttendanceStatus::Present, false),
            record(2, 4, AttendanceStatus::Present, false),
            record(3, 5, AttendanceStatus::HalfDay, false),
            record(4, 6, AttendanceStatus::Absent, false),
            record(5, 7, AttendanceStatus::Late, false),
            record(6, 10, AttendanceStatus::OnLeave, false),
        ];

        let summary = aggregate_attendance(&records, &[], november(), 1);

        assert_eq!(summary.presents, 2);
        assert_eq!(summary.half_days, 1);
        assert_eq!(summary.absents, 1);
        assert_eq!(summary.working_days, dec("2.5"));
    }

    #[test]
    fn test_no_records_yields_zero_working_days() {
        let summary = aggregate_attendance(&[], &[], november(), 1);

        assert_eq!(summary.presents, 0);
        assert_eq!(summary.working_days, Decimal::ZERO);
        assert_eq!(summary.overtime_hours, Decimal::ZERO);
        assert!(summary.audit_step.reasoning.contains("No attendance"));
    }

    #[test]
    fn test_records_outside_period_ignored() {
        let mut october = record(1, 1, AttendanceStatus::Present, false);
        october.date = NaiveDate::from_ymd_opt(2025, 10, 31).unwrap();
        let records = vec![october, record(2, 1, AttendanceStatus::Present, false)];

        let summary = aggregate_attendance(&records, &[], november(), 1);

        assert_eq!(summary.presents, 1);
    }

    #[test]
    fn test_only_hr_approved_overtime_on_flagged_days_counts() {
        let records = vec![
            record(1, 3, AttendanceStatus::Present, true),
            record(2, 4, AttendanceStatus::Present, false),
        ];
        let requests = vec![
            overtime(10, 1, "2.5", OvertimeStatus::HrApproved),
            overtime(11, 1, "1", OvertimeStatus::ManagerApproved),
            overtime(12, 2, "3", OvertimeStatus::HrApproved),
            overtime(13, 99, "4", OvertimeStatus::HrApproved),
        ];

        let summary = aggregate_attendance(&records, &requests, november(), 1);

        assert_eq!(summary.overtime_hours, dec("2.5"));
    }

    #[test]
    fn test_multiple_requests_on_one_day_sum() {
        let records = vec![record(1, 3, AttendanceStatus::Present, true)];
        let requests = vec![
            overtime(10, 1, "1.5", OvertimeStatus::HrApproved),
            overtime(11, 1, "2", OvertimeStatus::HrApproved),
        ];

        let summary = aggregate_attendance(&records, &requests, november(), 1);

        assert_eq!(summary.overtime_hours, dec("3.5"));
    }

    #[test]
    fn test_audit_step_output() {
        let records = vec![
            record(1, 3, AttendanceStatus::Present, false),
            record(2, 4, AttendanceStatus::HalfDay, false),
        ];

        let summary = aggregate_attendance(&records, &[], november(), 4);

        assert_eq!(summary.audit_step.step_number, 4);
        assert_eq!(summary.audit_step.rule_id, "attendance_aggregation");
        assert_eq!(
            summary.audit_step.output["working_days"].as_str().unwrap(),
            "1.5"
        );
    }
}
