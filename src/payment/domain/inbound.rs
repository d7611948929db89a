//! Inbound payments received on a task's account.

use super::{BtcAmount, PaymentId};
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An inbound payment received on a task's account.
///
/// `processed` is set once every participant share from this payment settled
/// in a single distribution round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPayment {
    id: PaymentId,
    task_id: TaskId,
    amount_received: BtcAmount,
    received_at: Option<DateTime<Utc>>,
    processed: bool,
}

impl TaskPayment {
    /// Creates a payment record that has not been received yet.
    #[must_use]
    pub const fn new(id: PaymentId, task_id: TaskId, amount_received: BtcAmount) -> Self {
        Self {
            id,
            task_id,
            amount_received,
            received_at: None,
            processed: false,
        }
    }

    /// Marks the payment received at the given instant.
    #[must_use]
    pub const fn received_at(mut self, at: DateTime<Utc>) -> Self {
        self.received_at = Some(at);
        self
    }

    /// Returns the payment identifier.
    #[must_use]
    pub const fn id(&self) -> PaymentId {
        self.id
    }

    /// Returns the task this payment belongs to.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the received amount.
    #[must_use]
    pub const fn amount_received(&self) -> BtcAmount {
        self.amount_received
    }

    /// Returns the receipt timestamp, if the payment has arrived.
    #[must_use]
    pub const fn received(&self) -> Option<DateTime<Utc>> {
        self.received_at
    }

    /// Returns whether every participant share has been settled.
    #[must_use]
    pub const fn processed(&self) -> bool {
        self.processed
    }

    /// Marks every participant share as settled.
    pub const fn mark_processed(&mut self) {
        self.processed = true;
    }
}
