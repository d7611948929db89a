//! Domain model for task invoices.

mod invoice;

pub use invoice::{InvoiceId, InvoiceNumber, TaskInvoice};
