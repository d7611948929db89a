//! Invoice number generation.

use crate::invoice::{
    domain::{InvoiceId, InvoiceNumber, TaskInvoice},
    ports::{InvoiceRepository, InvoiceRepositoryError},
};
use crate::task::{
    domain::TaskId,
    ports::{TaskRepository, TaskRepositoryError},
};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Service-level errors for invoice numbering.
#[derive(Debug, Error)]
pub enum NumberingError {
    /// The invoice does not exist.
    #[error("invoice not found: {0}")]
    InvoiceNotFound(InvoiceId),

    /// The invoiced task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// Invoice repository operation failed.
    #[error(transparent)]
    Invoices(#[from] InvoiceRepositoryError),

    /// Task repository operation failed.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),
}

/// Result type for numbering operations.
pub type NumberingResult<T> = Result<T, NumberingError>;

/// Invoice numbering service.
#[derive(Clone)]
pub struct InvoiceNumberingService<I, T>
where
    I: InvoiceRepository,
    T: TaskRepository,
{
    invoices: Arc<I>,
    tasks: Arc<T>,
}

impl<I, T> InvoiceNumberingService<I, T>
where
    I: InvoiceRepository,
    T: TaskRepository,
{
    /// Creates a new numbering service.
    #[must_use]
    pub const fn new(invoices: Arc<I>, tasks: Arc<T>) -> Self {
        Self { invoices, tasks }
    }

    /// Assigns a composite number to the invoice, or returns the existing
    /// one.
    ///
    /// The number concatenates the client's stable sequence, the invoice
    /// month as `YYYYMM`, the invoice's two-digit ordinal among the client's
    /// numbered invoices that month, and the task number. Once assigned the
    /// number never changes.
    ///
    /// # Errors
    ///
    /// Returns [`NumberingError`] on missing records or store failures.
    pub async fn generate_invoice_number(
        &self,
        invoice_id: InvoiceId,
    ) -> NumberingResult<TaskInvoice> {
        let mut invoice = self
            .invoices
            .find_by_id(invoice_id)
            .await?
            .ok_or(NumberingError::InvoiceNotFound(invoice_id))?;
        if invoice.number().is_some() {
            return Ok(invoice);
        }

        let task = self
            .tasks
            .find_by_id(invoice.task_id())
            .await?
            .ok_or(NumberingError::TaskNotFound(invoice.task_id()))?;
        let sequence = self.invoices.client_sequence(invoice.client()).await?;
        let prior = self
            .invoices
            .monthly_count_before(invoice.client(), invoice.created_at())
            .await?;
        let number = InvoiceNumber::compose(
            sequence,
            invoice.created_at(),
            prior + 1,
            task.task_number(),
        );
        invoice.assign_number(number.clone());
        self.invoices.update(&invoice).await?;
        info!(%invoice_id, %number, "invoice number assigned");
        Ok(invoice)
    }
}
