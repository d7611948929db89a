//! Task invoice aggregate.

use crate::task::domain::{TaskId, TaskNumber, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a task invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(Uuid);

impl InvoiceId {
    /// Creates a new random invoice identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an invoice identifier from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for InvoiceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Composite human-readable invoice number.
///
/// Reads `{client sequence}{YYYYMM}{ordinal}{task number}` where the ordinal
/// is the invoice's two-digit position among the client's invoices in that
/// calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceNumber(String);

impl InvoiceNumber {
    /// Composes an invoice number from its parts.
    #[must_use]
    pub fn compose(
        client_sequence: u32,
        created_at: DateTime<Utc>,
        monthly_ordinal: u32,
        task_number: TaskNumber,
    ) -> Self {
        Self(format!(
            "{client_sequence}{}{monthly_ordinal:02}{task_number}",
            created_at.format("%Y%m")
        ))
    }

    /// Returns the number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvoiceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Invoice raised against a task's client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskInvoice {
    id: InvoiceId,
    task_id: TaskId,
    client: UserId,
    created_at: DateTime<Utc>,
    number: Option<InvoiceNumber>,
}

impl TaskInvoice {
    /// Creates an unnumbered invoice.
    #[must_use]
    pub const fn new(
        id: InvoiceId,
        task_id: TaskId,
        client: UserId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            task_id,
            client,
            created_at,
            number: None,
        }
    }

    /// Returns the invoice identifier.
    #[must_use]
    pub const fn id(&self) -> InvoiceId {
        self.id
    }

    /// Returns the invoiced task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the client being invoiced.
    #[must_use]
    pub const fn client(&self) -> UserId {
        self.client
    }

    /// Returns the invoice creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the assigned number, when one has been generated.
    #[must_use]
    pub const fn number(&self) -> Option<&InvoiceNumber> {
        self.number.as_ref()
    }

    /// Assigns the invoice number. First write wins; later assignments are
    /// ignored.
    pub fn assign_number(&mut self, number: InvoiceNumber) {
        if self.number.is_none() {
            self.number = Some(number);
        }
    }
}
