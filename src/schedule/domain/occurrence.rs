//! Recurrence stepping for periodic check-ins.

use crate::task::domain::{Recurrence, RecurrenceUnit};
use chrono::{DateTime, Datelike, Duration, Months, Utc};

/// Base calendar unit a recurrence steps in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    /// Clock hours.
    Hours,
    /// Calendar days.
    Days,
    /// Calendar weeks.
    Weeks,
    /// Calendar months.
    Months,
    /// Calendar years.
    Years,
}

/// Tagged step a recurrence unit resolves to.
///
/// Quarterly recurrences step in months with a multiplier of 3; every other
/// unit maps one-to-one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecurrenceStep {
    /// Base unit to step in.
    pub unit: TimeUnit,
    /// Units per configured interval count.
    pub multiplier: u32,
}

impl From<RecurrenceUnit> for RecurrenceStep {
    fn from(unit: RecurrenceUnit) -> Self {
        match unit {
            RecurrenceUnit::Hourly => Self {
                unit: TimeUnit::Hours,
                multiplier: 1,
            },
            RecurrenceUnit::Daily => Self {
                unit: TimeUnit::Days,
                multiplier: 1,
            },
            RecurrenceUnit::Weekly => Self {
                unit: TimeUnit::Weeks,
                multiplier: 1,
            },
            RecurrenceUnit::Monthly => Self {
                unit: TimeUnit::Months,
                multiplier: 1,
            },
            RecurrenceUnit::Quarterly => Self {
                unit: TimeUnit::Months,
                multiplier: 3,
            },
            RecurrenceUnit::Yearly => Self {
                unit: TimeUnit::Years,
                multiplier: 1,
            },
        }
    }
}

/// Computes the next occurrence after the anchor for the given recurrence.
///
/// Month and year steps are calendar-aware (Jan 31 + 1 month = Feb 28).
/// Returns `None` on calendar overflow.
#[must_use]
pub fn next_occurrence(
    anchor: DateTime<Utc>,
    recurrence: Recurrence,
) -> Option<DateTime<Utc>> {
    let step = RecurrenceStep::from(recurrence.unit());
    let count = step.multiplier.checked_mul(recurrence.every())?;
    match step.unit {
        TimeUnit::Hours => anchor.checked_add_signed(Duration::hours(i64::from(count))),
        TimeUnit::Days => anchor.checked_add_signed(Duration::days(i64::from(count))),
        TimeUnit::Weeks => anchor.checked_add_signed(Duration::weeks(i64::from(count))),
        TimeUnit::Months => anchor.checked_add_months(Months::new(count)),
        TimeUnit::Years => anchor.checked_add_months(Months::new(count.checked_mul(12)?)),
    }
}

/// Pushes a weekend occurrence forward to the following Monday.
#[must_use]
pub fn shift_off_weekend(at: DateTime<Utc>) -> DateTime<Utc> {
    let days_from_monday = at.weekday().num_days_from_monday();
    if days_from_monday >= 5 {
        at + Duration::days(i64::from(7 - days_from_monday))
    } else {
        at
    }
}
