//! Port contracts for invoice persistence.

pub mod repository;

pub use repository::{InvoiceRepository, InvoiceRepositoryError, InvoiceRepositoryResult};
