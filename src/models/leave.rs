//! Leave records and per-organization leave policies.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A normalized leave type key.
///
/// Leave types arrive as free text ("Sick", "sick ", "SICK"); the key is
/// trimmed and lowercased on construction so policy lookups cannot miss on
/// case or padding.
///
/// # Example
///
/// ```
/// use payroll_engine::models::LeaveType;
///
/// assert_eq!(LeaveType::new(" Sick "), LeaveType::new("sick"));
/// assert_eq!(LeaveType::new("Casual").as_str(), "casual");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct LeaveType(String);

impl LeaveType {
    /// Creates a normalized leave type key.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim().to_lowercase())
    }

    /// Returns the normalized key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for LeaveType {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for LeaveType {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<LeaveType> for String {
    fn from(value: LeaveType) -> Self {
        value.0
    }
}

impl fmt::Display for LeaveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Approval state of a leave record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaveStatus {
    /// Awaiting review.
    Pending,
    /// Approved; the only state that affects payroll.
    Approved,
    /// Rejected.
    Rejected,
}

/// A leave taken (or requested) by an employee over an inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRecord {
    /// Unique identifier of the leave record.
    pub id: u64,
    /// The employee on leave.
    pub employee_id: u64,
    /// The leave type.
    pub leave_type: LeaveType,
    /// First day of leave (inclusive).
    pub start_date: NaiveDate,
    /// Last day of leave (inclusive).
    pub end_date: NaiveDate,
    /// Approval state.
    pub status: LeaveStatus,
}

impl LeaveRecord {
    /// Returns true if the leave is approved.
    pub fn is_approved(&self) -> bool {
        self.status == LeaveStatus::Approved
    }
}

/// An organization's policy for one leave type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeavePolicy {
    /// The organization the policy belongs to.
    pub organization_id: u64,
    /// The leave type the policy governs.
    pub leave_type: LeaveType,
    /// Annual quota in days.
    pub granted_days: Decimal,
    /// Whether leave of this type is paid.
    pub paid: bool,
    /// Whether the policy is currently in force.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl LeavePolicy {
    /// Returns true if the policy is active and pays out leave.
    pub fn is_paid_and_active(&self) -> bool {
        self.is_active && self.paid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_leave_type_normalizes_on_deserialize() {
        let leave_type: LeaveType = serde_json::from_str("\"  Annual \"").unwrap();
        assert_eq!(leave_type, LeaveType::new("annual"));
        assert_eq!(serde_json::to_string(&leave_type).unwrap(), "\"annual\"");
    }

    #[test]
    fn test_leave_record_deserialization() {
        let json = r#"{
            "id": 4,
            "employee_id": 7,
            "leave_type": "Sick",
            "start_date": "2025-10-29",
            "end_date": "2025-11-03",
            "status": "approved"
        }"#;
        let record: LeaveRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.leave_type.as_str(), "sick");
        assert!(record.is_approved());
    }

    #[test]
    fn test_policy_defaults_to_active() {
        let json = r#"{
            "organization_id": 1,
            "leave_type": "sick",
            "granted_days": "12",
            "paid": true
        }"#;
        let policy: LeavePolicy = serde_json::from_str(json).unwrap();
        assert!(policy.is_active);
        assert!(policy.is_paid_and_active());
        assert_eq!(policy.granted_days, Decimal::from_str("12").unwrap());
    }

    #[test]
    fn test_inactive_policy_is_not_paid() {
        let policy = LeavePolicy {
            organization_id: 1,
            leave_type: LeaveType::new("sick"),
            granted_days: Decimal::from(12),
            paid: true,
            is_active: false,
        };
        assert!(!policy.is_paid_and_active());
    }
}
