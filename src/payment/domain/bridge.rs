//! Mobile-money bridge wire types.

use super::BtcAmount;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Detail field holding the payout address in the first schema variant.
const OUT_DETAIL_BITCOIN_ADDRESS: &str = "bitcoin_address";
/// Detail field holding the payout address in the second schema variant.
const OUT_DETAIL_ADDRESS: &str = "Address";
/// Detail field holding the pay-in address fallback.
const IN_DETAIL_ADDRESS: &str = "address";

/// Provider-reported state of a bridge transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BridgeState {
    /// Created, recipient not yet funded.
    Initiated,
    /// Approved by the provider, settling.
    Approved,
    /// Recipient funded.
    Paid,
    /// Canceled; terminal.
    Canceled,
}

impl BridgeState {
    /// Returns whether the transaction was canceled.
    #[must_use]
    pub const fn is_canceled(self) -> bool {
        matches!(self, Self::Canceled)
    }
}

/// Correlation metadata echoed back by the bridge provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeMetadata {
    /// Our ledger entry identifier, submitted at creation.
    pub reference: String,
    /// Our nonce, submitted at creation.
    pub idem_key: String,
}

/// One pay-in leg of a bridge transaction.
///
/// The detail blocks are loosely-typed provider JSON; their schema has
/// drifted historically, so they stay untyped and are probed by
/// [`BridgeTransaction::payout_address`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayinMethod {
    /// Inbound-side details.
    pub in_details: Value,
    /// Outbound-side details.
    pub out_details: Value,
}

/// Transaction record returned by the bridge provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeTransaction {
    /// Provider transaction identifier.
    pub id: String,
    /// Provider-reported state.
    pub state: BridgeState,
    /// Echoed correlation metadata.
    pub metadata: BridgeMetadata,
    /// BTC amount the provider settled on the input side.
    pub input_amount: Decimal,
    /// Pay-in legs.
    pub payin_methods: Vec<PayinMethod>,
}

impl BridgeTransaction {
    /// Discovers the BTC payout address from the first pay-in leg.
    ///
    /// The outbound details carried `bitcoin_address` on first test but
    /// later appeared as `Address`; both are checked, falling back to the
    /// inbound details' `address`. The upstream schema inconsistency was
    /// never resolved, so all three probes stay.
    #[must_use]
    pub fn payout_address(&self) -> Option<String> {
        let method = self.payin_methods.first()?;
        let from_out = detail_str(&method.out_details, OUT_DETAIL_BITCOIN_ADDRESS)
            .or_else(|| detail_str(&method.out_details, OUT_DETAIL_ADDRESS));
        from_out.or_else(|| detail_str(&method.in_details, IN_DETAIL_ADDRESS))
    }
}

fn detail_str(details: &Value, key: &str) -> Option<String> {
    details
        .get(key)
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

/// Sender identity block submitted with every bridge transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeSender {
    /// ISO country code of the sending entity.
    pub country_code: String,
    /// Contact phone number.
    pub phone_number: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Contact email.
    pub email: String,
}

/// Payout request submitted to the bridge provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgePayoutRequest {
    /// Sender identity block.
    pub sender: BridgeSender,
    /// BTC amount to convert, normalized to satoshi precision.
    pub amount: BtcAmount,
    /// Input currency code.
    pub input_currency: String,
    /// Provider payout type derived from the recipient's country code.
    pub payout_type: String,
    /// Recipient first name.
    pub first_name: String,
    /// Recipient last name.
    pub last_name: String,
    /// Recipient mobile-money account number.
    pub phone_number: String,
    /// Our correlation reference (ledger entry identifier).
    pub reference: String,
    /// Fresh nonce the provider echoes back as idempotency metadata.
    pub nonce: Uuid,
}

/// Maps a recipient country code to the provider's mobile payout type.
#[must_use]
pub fn payout_type_for(country_code: &str) -> String {
    format!("{}::Mobile", country_code.trim().to_ascii_uppercase())
}
