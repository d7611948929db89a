//! Error types for payment domain validation.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors returned while constructing domain payment values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PaymentDomainError {
    /// The amount is negative.
    #[error("BTC amount must not be negative, got {0}")]
    NegativeAmount(Decimal),

    /// A provider metadata reference does not identify a ledger entry.
    #[error("invalid ledger reference: {0}")]
    InvalidLedgerReference(String),

    /// The settlement status string is unknown.
    #[error("unknown settlement status: {0}")]
    UnknownSettlementStatus(String),
}
