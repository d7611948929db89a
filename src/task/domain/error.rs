//! Error types for task domain validation.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The payment-share fraction is outside the `[0, 1]` range.
    #[error("invalid payment share {0}, expected a fraction between 0 and 1")]
    InvalidPaymentShare(Decimal),

    /// The BTC address does not look like a valid mainnet address.
    #[error("invalid BTC address: {0}")]
    InvalidBtcAddress(String),

    /// The recurrence interval count is zero.
    #[error("recurrence interval must be at least 1")]
    ZeroRecurrenceInterval,

    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTaskTitle,
}
