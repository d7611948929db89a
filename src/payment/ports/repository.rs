//! Repository ports for inbound payments and the settlement ledger.

use crate::payment::domain::{LedgerEntry, LedgerEntryId, PaymentId, TaskPayment};
use crate::task::domain::TaskId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for payment repository operations.
pub type PaymentRepositoryResult<T> = Result<T, PaymentRepositoryError>;

/// Inbound payment persistence contract.
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Returns the task's received, unprocessed payments.
    async fn unprocessed_payments(&self, task_id: TaskId)
    -> PaymentRepositoryResult<Vec<TaskPayment>>;

    /// Finds a payment by identifier.
    ///
    /// Returns `None` when the payment does not exist.
    async fn find_by_id(&self, id: PaymentId) -> PaymentRepositoryResult<Option<TaskPayment>>;

    /// Persists changes to an existing payment (`processed` flag).
    ///
    /// # Errors
    ///
    /// Returns [`PaymentRepositoryError::NotFound`] when the payment does
    /// not exist.
    async fn update(&self, payment: &TaskPayment) -> PaymentRepositoryResult<()>;
}

/// Errors returned by payment repository implementations.
#[derive(Debug, Clone, Error)]
pub enum PaymentRepositoryError {
    /// The payment was not found.
    #[error("payment not found: {0}")]
    NotFound(PaymentId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl PaymentRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

/// Result type for ledger repository operations.
pub type LedgerRepositoryResult<T> = Result<T, LedgerRepositoryError>;

/// Settlement ledger persistence contract.
///
/// The store's uniqueness enforcement on (payment, participation) is the
/// sole concurrency guard against duplicate dispatch: concurrent creation
/// attempts must resolve to a single row.
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Returns the entry for the candidate's (payment, participation) pair,
    /// inserting the candidate when no entry exists yet.
    ///
    /// The boolean reports whether the candidate was inserted.
    async fn get_or_create(
        &self,
        candidate: LedgerEntry,
    ) -> LedgerRepositoryResult<(LedgerEntry, bool)>;

    /// Finds an entry by identifier.
    ///
    /// Returns `None` when the entry does not exist.
    async fn find_entry(&self, id: LedgerEntryId) -> LedgerRepositoryResult<Option<LedgerEntry>>;

    /// Returns every entry created from the given payment.
    async fn entries_for_payment(
        &self,
        payment_id: PaymentId,
    ) -> LedgerRepositoryResult<Vec<LedgerEntry>>;

    /// Persists changes to an existing entry.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerRepositoryError::NotFound`] when the entry does not
    /// exist.
    async fn update(&self, entry: &LedgerEntry) -> LedgerRepositoryResult<()>;
}

/// Errors returned by ledger repository implementations.
#[derive(Debug, Clone, Error)]
pub enum LedgerRepositoryError {
    /// The ledger entry was not found.
    #[error("ledger entry not found: {0}")]
    NotFound(LedgerEntryId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl LedgerRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
