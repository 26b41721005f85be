//! Attendance and overtime request models.
//!
//! Both are read-only inputs to payroll: one attendance row per employee per
//! day, and overtime requests keyed by the attendance row they extend.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The recorded status of an employee's day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    /// Worked a full day.
    Present,
    /// Did not work and was not on leave.
    Absent,
    /// Arrived late.
    Late,
    /// Worked half a day.
    HalfDay,
    /// Covered by a leave record.
    OnLeave,
    /// Organization holiday.
    Holiday,
    /// Worked on an organization holiday.
    WorkOnHoliday,
}

/// A single day of attendance for an employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// Unique identifier of the attendance row.
    pub id: u64,
    /// The employee this row belongs to.
    pub employee_id: u64,
    /// The calendar day.
    pub date: NaiveDate,
    /// The recorded status.
    pub status: AttendanceStatus,
    /// Whether overtime was flagged on this day.
    #[serde(default)]
    pub is_overtime: bool,
    /// Total hours worked that day.
    #[serde(default)]
    pub total_work_hours: Decimal,
}

/// Approval state of an overtime request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OvertimeStatus {
    /// Awaiting review.
    Pending,
    /// Approved by the line manager only.
    ManagerApproved,
    /// Approved by HR; the only state that is paid.
    HrApproved,
    /// Rejected.
    Rejected,
}

/// A request to be paid for overtime worked on a given attendance day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OvertimeRequest {
    /// Unique identifier of the request.
    pub id: u64,
    /// The employee who worked the overtime.
    pub employee_id: u64,
    /// The attendance row this request extends.
    pub attendance_id: u64,
    /// The day the overtime was worked.
    pub work_date: NaiveDate,
    /// Approved overtime hours.
    pub actual_overtime_hours: Decimal,
    /// Approval state.
    pub status: OvertimeStatus,
}

impl OvertimeRequest {
    /// Returns true if the request has been approved by HR.
    pub fn is_payable(&self) -> bool {
        self.status == OvertimeStatus::HrApproved
    }
}
