//! Recurrence configuration for periodic progress check-ins.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};

/// Unit of the configured check-in interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceUnit {
    /// Every N hours.
    Hourly,
    /// Every N days.
    Daily,
    /// Every N weeks.
    Weekly,
    /// Every N months.
    Monthly,
    /// Every N quarters.
    Quarterly,
    /// Every N years.
    Yearly,
}

impl RecurrenceUnit {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }
}

/// Check-in recurrence configured on a task or project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurrence {
    every: u32,
    unit: RecurrenceUnit,
}

impl Recurrence {
    /// Creates a validated recurrence.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::ZeroRecurrenceInterval`] when `every` is
    /// zero.
    pub const fn new(every: u32, unit: RecurrenceUnit) -> Result<Self, TaskDomainError> {
        if every == 0 {
            return Err(TaskDomainError::ZeroRecurrenceInterval);
        }
        Ok(Self { every, unit })
    }

    /// Returns the interval count.
    #[must_use]
    pub const fn every(self) -> u32 {
        self.every
    }

    /// Returns the interval unit.
    #[must_use]
    pub const fn unit(self) -> RecurrenceUnit {
        self.unit
    }
}
