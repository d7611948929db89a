//! In-memory adapters for the invoice context.

mod invoices;

pub use invoices::InMemoryInvoiceRepository;
