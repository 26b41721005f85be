//! Leave reconciliation.
//!
//! This module splits the approved leave falling inside a pay period into paid
//! and unpaid days. Paid days are limited by the organization's annual quota
//! for the leave type, less the days already consumed by earlier approved
//! leave of that type. Quota usage is replayed from the leave history on every
//! run; there is no running balance.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{AuditStep, AuditWarning, LeavePolicy, LeaveRecord, LeaveType, PayPeriod};

/// How one approved leave record was split for the pay period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveAllocation {
    /// The leave record id.
    pub leave_id: u64,
    /// The leave type.
    pub leave_type: LeaveType,
    /// First day of the leave inside the period.
    pub effective_start: NaiveDate,
    /// Last day of the leave inside the period.
    pub effective_end: NaiveDate,
    /// Inclusive day count inside the period.
    pub days_in_month: Decimal,
    /// Days of the same type consumed by leave ending before the period.
    pub used_before: Decimal,
    /// Quota left before this leave, floored at zero.
    pub remaining_quota: Decimal,
    /// Days paid under the policy.
    pub paid_days: Decimal,
    /// Days not covered by a paid quota.
    pub unpaid_days: Decimal,
    /// Whether an active paid policy governed the leave type.
    pub paid_policy: bool,
}

/// The leave reconciliation for one employee and one pay period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveReconciliation {
    /// Total paid leave days across all allocations.
    pub paid_leave_days: Decimal,
    /// Total unpaid leave days across all allocations.
    pub unpaid_days: Decimal,
    /// Per-leave allocations, in input order.
    pub allocations: Vec<LeaveAllocation>,
    /// Inconsistent leave records that were skipped.
    pub warnings: Vec<AuditWarning>,
    /// The audit step recording this reconciliation.
    pub audit_step: AuditStep,
}

impl LeaveReconciliation {
    /// Paid plus unpaid leave days inside the period.
    pub fn total_leave_days(&self) -> Decimal {
        self.paid_leave_days + self.unpaid_days
    }
}

/// Counts the days from `start` to `end`, both inclusive.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::inclusive_days;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let start = NaiveDate::from_ymd_opt(2025, 11, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2025, 11, 3).unwrap();
/// assert_eq!(inclusive_days(start, end), Decimal::from(3));
/// assert_eq!(inclusive_days(start, start), Decimal::ONE);
/// ```
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> Decimal {
    Decimal::from((end - start).num_days() + 1)
}

/// Clips a leave interval to the pay period.
///
/// Returns `None` when nothing of the interval remains inside the period.
pub fn clip_to_period(
    start: NaiveDate,
    end: NaiveDate,
    period: PayPeriod,
) -> Option<(NaiveDate, NaiveDate)> {
    let effective_start = start.max(period.start_date());
    let effective_end = end.min(period.end_date());
    if effective_end < effective_start {
        None
    } else {
        Some((effective_start, effective_end))
    }
}

/// Sums the days of approved leave of `leave_type` that ended before `before`.
///
/// Each prior leave contributes its full inclusive length. Records with an end
/// date before their start date contribute nothing.
pub fn used_before(leaves: &[LeaveRecord], leave_type: &LeaveType, before: NaiveDate) -> Decimal {
    leaves
        .iter()
        .filter(|l| {
            l.is_approved()
                && &l.leave_type == leave_type
                && l.start_date <= l.end_date
                && l.end_date < before
        })
        .map(|l| inclusive_days(l.start_date, l.end_date))
        .sum()
}

/// Reconciles an employee's approved leave against the organization's policies.
///
/// For every approved leave overlapping the period:
/// 1. The interval is clipped to the period and counted inclusively.
/// 2. Without an active paid policy for the leave type, every day is unpaid.
/// 3. Otherwise `remaining = max(0, granted_days - used_before)` and
///    `paid = min(days_in_month, remaining)`; the rest is unpaid.
///
/// `leaves` must hold the employee's whole leave history so that prior quota
/// usage can be replayed. Records with `end_date < start_date` are skipped with
/// a warning.
pub fn reconcile_leave(
    leaves: &[LeaveRecord],
    policies: &[LeavePolicy],
    period: PayPeriod,
    step_number: u32,
) -> LeaveReconciliation {
    let mut paid_policies: HashMap<&LeaveType, &LeavePolicy> = HashMap::new();
    for policy in policies.iter().filter(|p| p.is_paid_and_active()) {
        paid_policies.entry(&policy.leave_type).or_insert(policy);
    }

    let mut allocations = Vec::new();
    let mut warnings = Vec::new();

    for leave in leaves.iter().filter(|l| l.is_approved()) {
        if leave.end_date < leave.start_date {
            warnings.push(AuditWarning::new(
                "LEAVE_INVALID_RANGE",
                format!(
                    "Leave {} ends {} before it starts {}; skipped",
                    leave.id, leave.end_date, leave.start_date
                ),
                "medium",
            ));
            continue;
        }

        let Some((effective_start, effective_end)) =
            clip_to_period(leave.start_date, leave.end_date, period)
        else {
            continue;
        };

        let days_in_month = inclusive_days(effective_start, effective_end);

        let allocation = match paid_policies.get(&leave.leave_type) {
            Some(policy) => {
                let used = used_before(leaves, &leave.leave_type, period.start_date());
                let remaining = (policy.granted_days - used).max(Decimal::ZERO);
                let paid_days = days_in_month.min(remaining);
                LeaveAllocation {
                    leave_id: leave.id,
                    leave_type: leave.leave_type.clone(),
                    effective_start,
                    effective_end,
                    days_in_month,
                    used_before: used,
                    remaining_quota: remaining,
                    paid_days,
                    unpaid_days: days_in_month - paid_days,
                    paid_policy: true,
                }
            }
            None => LeaveAllocation {
                leave_id: leave.id,
                leave_type: leave.leave_type.clone(),
                effective_start,
                effective_end,
                days_in_month,
                used_before: Decimal::ZERO,
                remaining_quota: Decimal::ZERO,
                paid_days: Decimal::ZERO,
                unpaid_days: days_in_month,
                paid_policy: false,
            },
        };

        allocations.push(allocation);
    }

    let paid_leave_days: Decimal = allocations.iter().map(|a| a.paid_days).sum();
    let unpaid_days: Decimal = allocations.iter().map(|a| a.unpaid_days).sum();

    let reasoning = if allocations.is_empty() {
        format!("No approved leave overlaps {}", period)
    } else {
        format!(
            "{} approved leave records overlap {}: {} paid days, {} unpaid days",
            allocations.len(),
            period,
            paid_leave_days.normalize(),
            unpaid_days.normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "leave_reconciliation".to_string(),
        rule_name: "Leave Reconciliation".to_string(),
        input: serde_json::json!({
            "pay_period": period.to_string(),
            "leave_records": leaves.len(),
            "paid_policies": paid_policies.len()
        }),
        output: serde_json::json!({
            "paid_leave_days": paid_leave_days.normalize().to_string(),
            "unpaid_days": unpaid_days.normalize().to_string(),
            "allocations": allocations.len(),
            "skipped": warnings.len()
        }),
        reasoning,
    };

    LeaveReconciliation {
        paid_leave_days,
        unpaid_days,
        allocations,
        warnings,
        audit_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LeaveStatus;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn november() -> PayPeriod {
        PayPeriod::new(2025, 11).unwrap()
    }

    fn leave(id: u64, leave_type: &str, start: NaiveDate, end: NaiveDate) -> LeaveRecord {
        LeaveRecord {
            id,
            employee_id: 7,
            leave_type: LeaveType::new(leave_type),
            start_date: start,
            end_date: end,
            status: LeaveStatus::Approved,
        }
    }

    fn policy(leave_type: &str, granted: &str, paid: bool) -> LeavePolicy {
        LeavePolicy {
            organization_id: 1,
            leave_type: LeaveType::new(leave_type),
            granted_days: dec(granted),
            paid,
            is_active: true,
        }
    }

    #[test]
    fn test_leave_spanning_month_start_is_clipped() {
        let leaves = vec![leave(1, "sick", date(2025, 10, 29), date(2025, 11, 3))];
        let policies = vec![policy("sick", "12", true)];

        let result = reconcile_leave(&leaves, &policies, november(), 1);

        let allocation = &result.allocations[0];
        assert_eq!(allocation.effective_start, date(2025, 11, 1));
        assert_eq!(allocation.effective_end, date(2025, 11, 3));
        assert_eq!(allocation.days_in_month, dec("3"));
        assert_eq!(result.paid_leave_days, dec("3"));
        assert_eq!(result.unpaid_days, dec("0"));
    }

    #[test]
    fn test_leave_spanning_month_end_is_clipped() {
        let leaves = vec![leave(1, "sick", date(2025, 11, 28), date(2025, 12, 2))];
        let policies = vec![policy("sick", "12", true)];

        let result = reconcile_leave(&leaves, &policies, november(), 1);

        assert_eq!(result.allocations[0].effective_end, date(2025, 11, 30));
        assert_eq!(result.allocations[0].days_in_month, dec("3"));
    }

    #[test]
    fn test_no_policy_makes_all_days_unpaid() {
        let leaves = vec![leave(1, "sabbatical", date(2025, 11, 10), date(2025, 11, 14))];
        let policies = vec![policy("sick", "12", true)];

        let result = reconcile_leave(&leaves, &policies, november(), 1);

        assert_eq!(result.paid_leave_days, dec("0"));
        assert_eq!(result.unpaid_days, dec("5"));
        assert!(!result.allocations[0].paid_policy);
    }

    #[test]
    fn test_unpaid_policy_makes_all_days_unpaid() {
        let leaves = vec![leave(1, "lwp", date(2025, 11, 10), date(2025, 11, 11))];
        let policies = vec![policy("lwp", "30", false)];

        let result = reconcile_leave(&leaves, &policies, november(), 1);

        assert_eq!(result.unpaid_days, dec("2"));
    }

    #[test]
    fn test_inactive_policy_is_ignored() {
        let leaves = vec![leave(1, "sick", date(2025, 11, 10), date(2025, 11, 11))];
        let mut inactive = policy("sick", "12", true);
        inactive.is_active = false;

        let result = reconcile_leave(&leaves, &[inactive], november(), 1);

        assert_eq!(result.unpaid_days, dec("2"));
    }

    #[test]
    fn test_policy_match_ignores_case() {
        let leaves = vec![leave(1, "Sick", date(2025, 11, 10), date(2025, 11, 11))];
        let policies = vec![policy("SICK", "12", true)];

        let result = reconcile_leave(&leaves, &policies, november(), 1);

        assert_eq!(result.paid_leave_days, dec("2"));
    }

    #[test]
    fn test_prior_usage_limits_paid_days() {
        let leaves = vec![
            leave(1, "casual", date(2025, 3, 3), date(2025, 3, 7)),
            leave(2, "casual", date(2025, 7, 1), date(2025, 7, 3)),
            leave(3, "casual", date(2025, 11, 10), date(2025, 11, 14)),
        ];
        let policies = vec![policy("casual", "10", true)];

        let result = reconcile_leave(&leaves, &policies, november(), 1);

        let allocation = &result.allocations[0];
        assert_eq!(allocation.used_before, dec("8"));
        assert_eq!(allocation.remaining_quota, dec("2"));
        assert_eq!(result.paid_leave_days, dec("2"));
        assert_eq!(result.unpaid_days, dec("3"));
    }

    #[test]
    fn test_exhausted_quota_floors_at_zero() {
        let leaves = vec![
            leave(1, "casual", date(2025, 1, 1), date(2025, 1, 15)),
            leave(2, "casual", date(2025, 11, 10), date(2025, 11, 11)),
        ];
        let policies = vec![policy("casual", "10", true)];

        let result = reconcile_leave(&leaves, &policies, november(), 1);

        assert_eq!(result.allocations[0].remaining_quota, dec("0"));
        assert_eq!(result.paid_leave_days, dec("0"));
        assert_eq!(result.unpaid_days, dec("2"));
    }

    #[test]
    fn test_prior_usage_counts_only_same_type_and_approved() {
        let mut rejected = leave(1, "casual", date(2025, 3, 3), date(2025, 3, 7));
        rejected.status = LeaveStatus::Rejected;
        let leaves = vec![
            rejected,
            leave(2, "sick", date(2025, 4, 1), date(2025, 4, 9)),
            leave(3, "casual", date(2025, 11, 10), date(2025, 11, 12)),
        ];
        let policies = vec![policy("casual", "2", true), policy("sick", "12", true)];

        let result = reconcile_leave(&leaves, &policies, november(), 1);

        assert_eq!(result.allocations[0].used_before, dec("0"));
        assert_eq!(result.paid_leave_days, dec("2"));
        assert_eq!(result.unpaid_days, dec("1"));
    }

    #[test]
    fn test_leave_straddling_month_start_not_counted_as_prior_usage() {
        // Ends inside November, so it is this month's leave, not prior usage.
        let leaves = vec![
            leave(1, "sick", date(2025, 10, 29), date(2025, 11, 3)),
            leave(2, "sick", date(2025, 11, 20), date(2025, 11, 21)),
        ];
        let policies = vec![policy("sick", "4", true)];

        let result = reconcile_leave(&leaves, &policies, november(), 1);

        assert_eq!(result.allocations[0].used_before, dec("0"));
        assert_eq!(result.allocations[1].used_before, dec("0"));
        assert_eq!(result.paid_leave_days, dec("5"));
    }

    #[test]
    fn test_pending_and_rejected_leave_ignored() {
        let mut pending = leave(1, "sick", date(2025, 11, 3), date(2025, 11, 4));
        pending.status = LeaveStatus::Pending;
        let mut rejected = leave(2, "sick", date(2025, 11, 5), date(2025, 11, 6));
        rejected.status = LeaveStatus::Rejected;

        let result = reconcile_leave(&[pending, rejected], &[], november(), 1);

        assert!(result.allocations.is_empty());
        assert_eq!(result.total_leave_days(), dec("0"));
    }

    #[test]
    fn test_leave_outside_period_ignored() {
        let leaves = vec![leave(1, "sick", date(2025, 12, 1), date(2025, 12, 3))];

        let result = reconcile_leave(&leaves, &[], november(), 1);

        assert!(result.allocations.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_inverted_leave_skipped_with_warning() {
        let leaves = vec![leave(1, "sick", date(2025, 11, 10), date(2025, 11, 5))];

        let result = reconcile_leave(&leaves, &[], november(), 1);

        assert!(result.allocations.is_empty());
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].code, "LEAVE_INVALID_RANGE");
    }

    #[test]
    fn test_reconciliation_is_idempotent() {
        let leaves = vec![
            leave(1, "casual", date(2025, 2, 3), date(2025, 2, 6)),
            leave(2, "casual", date(2025, 11, 10), date(2025, 11, 14)),
        ];
        let policies = vec![policy("casual", "6", true)];

        let first = reconcile_leave(&leaves, &policies, november(), 1);
        let second = reconcile_leave(&leaves, &policies, november(), 1);

        assert_eq!(first.allocations, second.allocations);
        assert_eq!(first.paid_leave_days, second.paid_leave_days);
        assert_eq!(first.unpaid_days, second.unpaid_days);
    }

    #[test]
    fn test_clip_to_period_disjoint_returns_none() {
        assert!(clip_to_period(date(2025, 9, 1), date(2025, 9, 5), november()).is_none());
    }

    #[test]
    fn test_audit_step_records_totals() {
        let leaves = vec![leave(1, "sick", date(2025, 11, 3), date(2025, 11, 4))];
        let policies = vec![policy("sick", "12", true)];

        let result = reconcile_leave(&leaves, &policies, november(), 2);

        assert_eq!(result.audit_step.step_number, 2);
        assert_eq!(result.audit_step.rule_id, "leave_reconciliation");
        assert_eq!(
            result.audit_step.output["paid_leave_days"].as_str().unwrap(),
            "2"
        );
    }
}
