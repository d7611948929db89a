//! Repository port for task invoices.

use crate::invoice::domain::{InvoiceId, TaskInvoice};
use crate::task::domain::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for invoice repository operations.
pub type InvoiceRepositoryResult<T> = Result<T, InvoiceRepositoryError>;

/// Invoice persistence contract.
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Finds an invoice by identifier.
    ///
    /// Returns `None` when the invoice does not exist.
    async fn find_by_id(&self, id: InvoiceId) -> InvoiceRepositoryResult<Option<TaskInvoice>>;

    /// Persists changes to an existing invoice (number assignment).
    ///
    /// # Errors
    ///
    /// Returns [`InvoiceRepositoryError::NotFound`] when the invoice does
    /// not exist.
    async fn update(&self, invoice: &TaskInvoice) -> InvoiceRepositoryResult<()>;

    /// Returns the client's stable sequence number, allocating the next one
    /// on first use.
    async fn client_sequence(&self, client: UserId) -> InvoiceRepositoryResult<u32>;

    /// Counts the client's invoices created in the same calendar month as
    /// `at` and strictly before it, numbered or not. Counting by creation
    /// time keeps ordinals stable when invoices are numbered out of order.
    async fn monthly_count_before(
        &self,
        client: UserId,
        at: DateTime<Utc>,
    ) -> InvoiceRepositoryResult<u32>;
}

/// Errors returned by invoice repository implementations.
#[derive(Debug, Clone, Error)]
pub enum InvoiceRepositoryError {
    /// The invoice was not found.
    #[error("invoice not found: {0}")]
    NotFound(InvoiceId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl InvoiceRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
