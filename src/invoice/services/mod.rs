//! Application services for the invoice context.

pub mod numbering;

pub use numbering::{InvoiceNumberingService, NumberingError, NumberingResult};
