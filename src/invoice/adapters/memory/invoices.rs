//! In-memory invoice repository.

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::invoice::{
    domain::{InvoiceId, TaskInvoice},
    ports::{InvoiceRepository, InvoiceRepositoryError, InvoiceRepositoryResult},
};
use crate::task::domain::UserId;

#[derive(Debug, Default)]
struct State {
    invoices: HashMap<InvoiceId, TaskInvoice>,
    sequences: HashMap<UserId, u32>,
    next_sequence: u32,
}

/// Thread-safe in-memory invoice repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryInvoiceRepository {
    state: Arc<RwLock<State>>,
}

impl InMemoryInvoiceRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an invoice.
    ///
    /// # Errors
    ///
    /// Returns [`InvoiceRepositoryError::Persistence`] when the store lock
    /// is poisoned.
    pub fn insert_invoice(&self, invoice: TaskInvoice) -> InvoiceRepositoryResult<()> {
        let mut state = self.write()?;
        state.invoices.insert(invoice.id(), invoice);
        Ok(())
    }

    fn write(&self) -> InvoiceRepositoryResult<std::sync::RwLockWriteGuard<'_, State>> {
        self.state.write().map_err(|err| {
            InvoiceRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn read(&self) -> InvoiceRepositoryResult<std::sync::RwLockReadGuard<'_, State>> {
        self.state.read().map_err(|err| {
            InvoiceRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl InvoiceRepository for InMemoryInvoiceRepository {
    async fn find_by_id(&self, id: InvoiceId) -> InvoiceRepositoryResult<Option<TaskInvoice>> {
        let state = self.read()?;
        Ok(state.invoices.get(&id).cloned())
    }

    async fn update(&self, invoice: &TaskInvoice) -> InvoiceRepositoryResult<()> {
        let mut state = self.write()?;
        let Some(stored) = state.invoices.get_mut(&invoice.id()) else {
            return Err(InvoiceRepositoryError::NotFound(invoice.id()));
        };
        *stored = invoice.clone();
        Ok(())
    }

    async fn client_sequence(&self, client: UserId) -> InvoiceRepositoryResult<u32> {
        let mut state = self.write()?;
        if let Some(sequence) = state.sequences.get(&client) {
            return Ok(*sequence);
        }
        state.next_sequence += 1;
        let sequence = state.next_sequence;
        state.sequences.insert(client, sequence);
        Ok(sequence)
    }

    async fn monthly_count_before(
        &self,
        client: UserId,
        at: DateTime<Utc>,
    ) -> InvoiceRepositoryResult<u32> {
        let state = self.read()?;
        let count = state
            .invoices
            .values()
            .filter(|invoice| {
                invoice.client() == client
                    && invoice.created_at().year() == at.year()
                    && invoice.created_at().month() == at.month()
                    && invoice.created_at() < at
            })
            .count();
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }
}
