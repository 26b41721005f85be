//! Pay period model.
//!
//! This module contains the [`PayPeriod`] type, the calendar month that is the
//! unit of payroll generation.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A calendar month identified as `YYYY-MM`.
///
/// The period always covers the whole month, first day to last day inclusive.
/// It serializes as its `YYYY-MM` storage form.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayPeriod;
/// use chrono::NaiveDate;
///
/// let period = PayPeriod::parse_request_month("11-2025").unwrap();
///
/// assert_eq!(period.to_string(), "2025-11");
/// assert_eq!(period.days_in_month(), 30);
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2025, 11, 30).unwrap()));
/// assert!(!period.contains_date(NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PayPeriod {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl PayPeriod {
    /// Creates the pay period for the given year and month (1-12).
    pub fn new(year: i32, month: u32) -> EngineResult<Self> {
        let invalid = |message: &str| EngineError::InvalidPayPeriod {
            value: format!("{:04}-{:02}", year, month),
            message: message.to_string(),
        };

        if !(1..=12).contains(&month) {
            return Err(invalid("month must be between 1 and 12"));
        }

        let start_date =
            NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| invalid("year out of range"))?;
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let end_date = NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|d| d.pred_opt())
            .ok_or_else(|| invalid("year out of range"))?;

        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// Parses the `MM-YYYY` form used by generation requests.
    pub fn parse_request_month(value: &str) -> EngineResult<Self> {
        let (month, year) = split_pair(value, "expected MM-YYYY")?;
        Self::new(year, month).map_err(|err| relabel(err, value))
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.start_date.year()
    }

    /// The calendar month (1-12).
    pub fn month(&self) -> u32 {
        self.start_date.month()
    }

    /// The first day of the month.
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// The last day of the month.
    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Number of calendar days in the month (28-31).
    pub fn days_in_month(&self) -> u32 {
        self.end_date.day()
    }

    /// Checks if a given date falls within this pay period (inclusive).
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

fn split_pair(value: &str, expected: &str) -> EngineResult<(u32, i32)> {
    let invalid = || EngineError::InvalidPayPeriod {
        value: value.to_string(),
        message: expected.to_string(),
    };

    let (left, right) = value.trim().split_once('-').ok_or_else(invalid)?;
    if left.len() != 2 || right.len() != 4 {
        return Err(invalid());
    }
    let month = left.parse::<u32>().map_err(|_| invalid())?;
    let year = right.parse::<i32>().map_err(|_| invalid())?;
    Ok((month, year))
}

fn relabel(err: EngineError, value: &str) -> EngineError {
    match err {
        EngineError::InvalidPayPeriod { message, .. } => EngineError::InvalidPayPeriod {
            value: value.to_string(),
            message,
        },
        other => other,
    }
}

impl fmt::Display for PayPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for PayPeriod {
    type Err = EngineError;

    /// Parses the `YYYY-MM` storage form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidPayPeriod {
            value: s.to_string(),
            message: "expected YYYY-MM".to_string(),
        };

        let (left, right) = s.trim().split_once('-').ok_or_else(invalid)?;
        if left.len() != 4 || right.len() != 2 {
            return Err(invalid());
        }
        let year = left.parse::<i32>().map_err(|_| invalid())?;
        let month = right.parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|err| relabel(err, s))
    }
}

impl TryFrom<String> for PayPeriod {
    type Error = EngineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PayPeriod> for String {
    fn from(period: PayPeriod) -> Self {
        period.to_string()
    }
}
