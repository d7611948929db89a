//! BTC amounts with provider-safe precision.

use super::PaymentDomainError;
use crate::task::domain::PaymentShare;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Currency code submitted to both payment providers.
pub const CURRENCY_BTC: &str = "BTC";

/// Decimal places carried by provider-bound amounts (satoshi precision).
const BTC_SCALE: u32 = 8;

/// Non-negative BTC amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BtcAmount(Decimal);

impl BtcAmount {
    /// Creates a validated amount.
    ///
    /// # Errors
    ///
    /// Returns [`PaymentDomainError::NegativeAmount`] when the value is
    /// negative.
    pub fn new(value: Decimal) -> Result<Self, PaymentDomainError> {
        if value.is_sign_negative() {
            return Err(PaymentDomainError::NegativeAmount(value));
        }
        Ok(Self(value))
    }

    /// Creates an amount from a provider-reported figure.
    ///
    /// Providers report sends as negative balance movements; the sign is
    /// dropped and the value rounded to satoshi precision.
    #[must_use]
    pub fn absolute(value: Decimal) -> Self {
        Self(value.abs().round_dp(BTC_SCALE))
    }

    /// Rounds to satoshi precision, the largest scale providers accept.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self(self.0.round_dp(BTC_SCALE))
    }

    /// Computes this amount's portion for the given share fraction, rounded
    /// to satoshi precision.
    #[must_use]
    pub fn share(self, share: PaymentShare) -> Self {
        Self((self.0 * share.value()).round_dp(BTC_SCALE))
    }

    /// Returns the underlying decimal value.
    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }

    /// Returns whether the amount is zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for BtcAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
