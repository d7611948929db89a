//! Payout configuration carried on user profiles.

use super::{TaskDomainError, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validated Bitcoin mainnet address.
///
/// Validation is format-level only: legacy (`1`/`3`) or bech32 (`bc1`)
/// prefix, plausible length, no whitespace. Ownership of the address is the
/// profile holder's problem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BtcAddress(String);

impl BtcAddress {
    /// Creates a validated BTC address.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidBtcAddress`] when the value fails
    /// the format check.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if Self::looks_valid(trimmed) {
            Ok(Self(trimmed.to_owned()))
        } else {
            Err(TaskDomainError::InvalidBtcAddress(raw))
        }
    }

    /// Returns whether the value passes the format check used for
    /// destination fallback decisions.
    #[must_use]
    pub fn looks_valid(value: &str) -> bool {
        let len = value.chars().count();
        let prefixed =
            value.starts_with('1') || value.starts_with('3') || value.starts_with("bc1");
        (26..=62).contains(&len)
            && prefixed
            && value.chars().all(|ch| ch.is_ascii_alphanumeric())
    }

    /// Returns the address as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for BtcAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for BtcAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Payment rail a payout method settles through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutRail {
    /// Immediate on-chain send through the direct gateway.
    Direct,
    /// Mobile-money bridge requiring asynchronous confirmation.
    Bridge,
}

/// Payout destination configured on a user profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PayoutMethod {
    /// Plain on-chain address the user controls.
    BtcAddress {
        /// Destination address.
        address: BtcAddress,
    },
    /// Hosted wallet address.
    BtcWallet {
        /// Destination address.
        address: BtcAddress,
    },
    /// Mobile-money account reached through the bridge provider.
    MobileMoney {
        /// ISO country code selecting the bridge payout type.
        country_code: String,
        /// Mobile-money account number.
        phone_number: String,
    },
}

impl PayoutMethod {
    /// Returns the rail this method settles through.
    #[must_use]
    pub const fn rail(&self) -> PayoutRail {
        match self {
            Self::BtcAddress { .. } | Self::BtcWallet { .. } => PayoutRail::Direct,
            Self::MobileMoney { .. } => PayoutRail::Bridge,
        }
    }

    /// Returns the on-file address for direct-rail methods.
    #[must_use]
    pub const fn direct_address(&self) -> Option<&BtcAddress> {
        match self {
            Self::BtcAddress { address } | Self::BtcWallet { address } => Some(address),
            Self::MobileMoney { .. } => None,
        }
    }
}

/// Profile data the settlement and sync services need about a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    id: UserId,
    display_name: String,
    first_name: String,
    last_name: String,
    email: String,
    payout: Option<PayoutMethod>,
}

impl UserProfile {
    /// Creates a profile without a payout method configured.
    #[must_use]
    pub fn new(
        id: UserId,
        display_name: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            payout: None,
        }
    }

    /// Sets the payout method.
    #[must_use]
    pub fn with_payout(mut self, payout: PayoutMethod) -> Self {
        self.payout = Some(payout);
        self
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the display name used in payment memos.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the first name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Returns the last name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Returns the email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the configured payout method, if any.
    #[must_use]
    pub const fn payout(&self) -> Option<&PayoutMethod> {
        self.payout.as_ref()
    }
}
