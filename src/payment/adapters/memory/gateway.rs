//! In-memory gateway doubles for distribution tests.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::payment::{
    domain::{
        BridgeMetadata, BridgePayoutRequest, BridgeState, BridgeTransaction, DirectSendReceipt,
        PayinMethod, TransferStatus,
    },
    ports::{BridgeGateway, DirectSendGateway, DirectSendRequest, GatewayError, GatewayResult},
};

fn poisoned(err: impl std::fmt::Display) -> GatewayError {
    GatewayError::Unavailable(err.to_string())
}

/// Direct-send double that records every request.
///
/// Receipts echo the requested amount as a negative balance movement, the
/// way the real provider reports sends.
#[derive(Debug, Clone, Default)]
pub struct RecordingDirectGateway {
    state: Arc<RwLock<DirectState>>,
}

#[derive(Debug)]
struct DirectState {
    requests: Vec<DirectSendRequest>,
    next_status: TransferStatus,
    unavailable: bool,
    counter: u64,
}

impl Default for DirectState {
    fn default() -> Self {
        Self {
            requests: Vec::new(),
            next_status: TransferStatus::Completed,
            unavailable: false,
            counter: 0,
        }
    }
}

impl RecordingDirectGateway {
    /// Creates a gateway that completes every send.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the status reported on subsequent sends.
    ///
    /// # Errors
    ///
    /// Returns a gateway error when the lock is poisoned.
    pub fn respond_with(&self, status: TransferStatus) -> GatewayResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.next_status = status;
        Ok(())
    }

    /// Makes subsequent sends fail with a transport error.
    ///
    /// # Errors
    ///
    /// Returns a gateway error when the lock is poisoned.
    pub fn set_unavailable(&self, unavailable: bool) -> GatewayResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.unavailable = unavailable;
        Ok(())
    }

    /// Returns every request received so far.
    ///
    /// # Errors
    ///
    /// Returns a gateway error when the lock is poisoned.
    pub fn requests(&self) -> GatewayResult<Vec<DirectSendRequest>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.requests.clone())
    }
}

#[async_trait]
impl DirectSendGateway for RecordingDirectGateway {
    async fn send(&self, request: DirectSendRequest) -> GatewayResult<DirectSendReceipt> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.unavailable {
            return Err(GatewayError::Unavailable("direct gateway offline".to_owned()));
        }
        state.counter += 1;
        let receipt = DirectSendReceipt {
            id: format!("send-{}", state.counter),
            status: state.next_status,
            amount: -request.amount.value(),
        };
        state.requests.push(request);
        Ok(receipt)
    }
}

/// Bridge double with a scriptable payout address and transaction states.
#[derive(Debug, Clone, Default)]
pub struct ScriptedBridgeGateway {
    state: Arc<RwLock<BridgeDoubleState>>,
}

#[derive(Debug)]
struct BridgeDoubleState {
    counter: u64,
    payout_address: Option<String>,
    payout_address_field: String,
    input_amount_override: Option<Decimal>,
    reject_creates: bool,
    requests: Vec<BridgePayoutRequest>,
    transactions: HashMap<String, BridgeTransaction>,
}

impl Default for BridgeDoubleState {
    fn default() -> Self {
        Self {
            counter: 0,
            payout_address: None,
            payout_address_field: "bitcoin_address".to_owned(),
            input_amount_override: None,
            reject_creates: false,
            requests: Vec::new(),
            transactions: HashMap::new(),
        }
    }
}

impl ScriptedBridgeGateway {
    /// Creates a gateway whose transactions carry no payout address, so
    /// completion stays asynchronous until one is configured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the payout address carried by created transactions.
    ///
    /// # Errors
    ///
    /// Returns a gateway error when the lock is poisoned.
    pub fn set_payout_address(&self, address: impl Into<String>) -> GatewayResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.payout_address = Some(address.into());
        Ok(())
    }

    /// Selects which detail field carries the payout address.
    ///
    /// `"address"` places it in the inbound details (the historical
    /// fallback); anything else becomes an outbound detail key.
    ///
    /// # Errors
    ///
    /// Returns a gateway error when the lock is poisoned.
    pub fn set_payout_address_field(&self, field: impl Into<String>) -> GatewayResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.payout_address_field = field.into();
        Ok(())
    }

    /// Overrides the settled input amount reported on created transactions.
    ///
    /// # Errors
    ///
    /// Returns a gateway error when the lock is poisoned.
    pub fn set_input_amount(&self, amount: Decimal) -> GatewayResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.input_amount_override = Some(amount);
        Ok(())
    }

    /// Makes subsequent creations fail.
    ///
    /// # Errors
    ///
    /// Returns a gateway error when the lock is poisoned.
    pub fn reject_creates(&self, reject: bool) -> GatewayResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.reject_creates = reject;
        Ok(())
    }

    /// Flips a stored transaction to the canceled state.
    ///
    /// # Errors
    ///
    /// Returns a rejection when the reference is unknown or a transport
    /// error when the lock is poisoned.
    pub fn cancel_transaction(&self, provider_ref: &str) -> GatewayResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        let transaction = state
            .transactions
            .get_mut(provider_ref)
            .ok_or_else(|| GatewayError::Rejected(format!("unknown transaction {provider_ref}")))?;
        transaction.state = BridgeState::Canceled;
        Ok(())
    }

    /// Returns every creation request received so far.
    ///
    /// # Errors
    ///
    /// Returns a gateway error when the lock is poisoned.
    pub fn requests(&self) -> GatewayResult<Vec<BridgePayoutRequest>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.requests.clone())
    }
}

fn payin_method(state: &BridgeDoubleState) -> PayinMethod {
    let Some(ref address) = state.payout_address else {
        return PayinMethod {
            in_details: json!({}),
            out_details: json!({}),
        };
    };
    if state.payout_address_field == "address" {
        PayinMethod {
            in_details: json!({ "address": address }),
            out_details: json!({}),
        }
    } else {
        let mut out_details = serde_json::Map::new();
        out_details.insert(state.payout_address_field.clone(), json!(address));
        PayinMethod {
            in_details: json!({}),
            out_details: serde_json::Value::Object(out_details),
        }
    }
}

#[async_trait]
impl BridgeGateway for ScriptedBridgeGateway {
    async fn create_transaction(
        &self,
        request: BridgePayoutRequest,
    ) -> GatewayResult<BridgeTransaction> {
        let mut state = self.state.write().map_err(poisoned)?;
        if state.reject_creates {
            return Err(GatewayError::Rejected("bridge rejected payout".to_owned()));
        }
        state.counter += 1;
        let transaction = BridgeTransaction {
            id: format!("bridge-{}", state.counter),
            state: BridgeState::Approved,
            metadata: BridgeMetadata {
                reference: request.reference.clone(),
                idem_key: request.nonce.to_string(),
            },
            input_amount: state
                .input_amount_override
                .unwrap_or_else(|| request.amount.value()),
            payin_methods: vec![payin_method(&state)],
        };
        state
            .transactions
            .insert(transaction.id.clone(), transaction.clone());
        state.requests.push(request);
        Ok(transaction)
    }

    async fn fetch_transaction(
        &self,
        provider_ref: &str,
    ) -> GatewayResult<Option<BridgeTransaction>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.transactions.get(provider_ref).cloned())
    }
}
