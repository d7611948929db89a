//! Participation records linking users to tasks.

use super::{ParticipationId, TaskDomainError, TaskId, UserId, UserProfile};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fraction of a task's payment owed to one participant.
///
/// Shares across a task's participants are assumed to sum to 1; this type
/// only enforces the per-share `[0, 1]` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentShare(Decimal);

impl PaymentShare {
    /// Creates a validated share fraction.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidPaymentShare`] when the value is
    /// negative or exceeds 1.
    pub fn new(value: Decimal) -> Result<Self, TaskDomainError> {
        if value.is_sign_negative() || value > Decimal::ONE {
            return Err(TaskDomainError::InvalidPaymentShare(value));
        }
        Ok(Self(value))
    }

    /// Returns the underlying fraction.
    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }
}

impl fmt::Display for PaymentShare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Links a user to a task with an acceptance flag, an activation timestamp,
/// and a payment-share fraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participation {
    id: ParticipationId,
    task_id: TaskId,
    user_id: UserId,
    accepted: bool,
    activated_at: Option<DateTime<Utc>>,
    share: PaymentShare,
}

impl Participation {
    /// Creates a participation record.
    #[must_use]
    pub const fn new(
        id: ParticipationId,
        task_id: TaskId,
        user_id: UserId,
        share: PaymentShare,
    ) -> Self {
        Self {
            id,
            task_id,
            user_id,
            accepted: false,
            activated_at: None,
            share,
        }
    }

    /// Marks the participation accepted and active from the given instant.
    #[must_use]
    pub const fn accepted_at(mut self, activated_at: DateTime<Utc>) -> Self {
        self.accepted = true;
        self.activated_at = Some(activated_at);
        self
    }

    /// Returns the participation identifier.
    #[must_use]
    pub const fn id(&self) -> ParticipationId {
        self.id
    }

    /// Returns the task this participation belongs to.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the participating user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns whether the participant accepted the task.
    #[must_use]
    pub const fn accepted(&self) -> bool {
        self.accepted
    }

    /// Returns the activation timestamp, if the participation was accepted.
    #[must_use]
    pub const fn activated_at(&self) -> Option<DateTime<Utc>> {
        self.activated_at
    }

    /// Returns the payment-share fraction.
    #[must_use]
    pub const fn share(&self) -> PaymentShare {
        self.share
    }
}

/// A participation paired with the participant's profile.
///
/// The settlement engine needs both the share fraction and the payout
/// configuration; repositories resolve the pair in one lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    participation: Participation,
    profile: UserProfile,
}

impl Participant {
    /// Pairs a participation with its profile.
    #[must_use]
    pub const fn new(participation: Participation, profile: UserProfile) -> Self {
        Self {
            participation,
            profile,
        }
    }

    /// Returns the participation record.
    #[must_use]
    pub const fn participation(&self) -> &Participation {
        &self.participation
    }

    /// Returns the participant's profile.
    #[must_use]
    pub const fn profile(&self) -> &UserProfile {
        &self.profile
    }
}
