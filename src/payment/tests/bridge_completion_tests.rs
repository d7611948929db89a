//! Bridge-rail settlement and completion behaviour.

use super::fixtures::{
    BRIDGE_PAYOUT_ADDRESS, harness, mobile_participant, paid_task, received_payment,
    direct_participant,
};
use crate::payment::{
    domain::{BridgeMetadata, BridgeState, BridgeTransaction, PayinMethod, SettlementStatus},
    ports::LedgerRepository,
};
use rstest::rstest;
use rust_decimal_macros::dec;
use serde_json::json;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn bridge_payout_settles_synchronously_when_address_is_reported() {
    let harness = harness();
    let task = paid_task();
    harness.tasks.insert_task(&task).expect("seed task");
    let participant = mobile_participant(task.id(), dec!(1));
    harness.tasks.insert_participant(&participant).expect("seed participant");
    let payment = received_payment(task.id(), dec!(0.02));
    harness.store.insert_payment(&payment).expect("seed payment");
    harness
        .bridge
        .set_payout_address(BRIDGE_PAYOUT_ADDRESS)
        .expect("configure bridge");

    let outcome = harness
        .service
        .distribute_task_payment(task.id())
        .await
        .expect("distribution should succeed");

    assert!(outcome.task_distributed);
    let creates = harness.bridge.requests().expect("recorded requests");
    assert_eq!(creates.len(), 1);
    assert_eq!(creates.first().map(|request| request.payout_type.as_str()), Some("KE::Mobile"));

    // The confirmed amount is forwarded on-chain to the discovered address.
    let forwards = harness.direct.requests().expect("recorded requests");
    assert_eq!(forwards.len(), 1);
    assert_eq!(
        forwards.first().map(|request| request.destination.as_str()),
        Some(BRIDGE_PAYOUT_ADDRESS)
    );

    let entries = harness
        .store
        .entries_for_payment(payment.id())
        .await
        .expect("entries lookup");
    let entry = entries.first().expect("entry should exist");
    assert_eq!(entry.status(), SettlementStatus::Processing);
    assert_eq!(
        entry.destination().map(|address| address.as_str()),
        Some(BRIDGE_PAYOUT_ADDRESS)
    );
    assert!(entry.extra().is_some_and(|extra| extra.contains("bridge-1")));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn initiated_payout_is_polled_rather_than_recreated() {
    let harness = harness();
    let task = paid_task();
    harness.tasks.insert_task(&task).expect("seed task");
    let participant = mobile_participant(task.id(), dec!(1));
    harness.tasks.insert_participant(&participant).expect("seed participant");
    let payment = received_payment(task.id(), dec!(0.02));
    harness.store.insert_payment(&payment).expect("seed payment");

    // No payout address: the transaction is created but cannot complete.
    let first = harness
        .service
        .distribute_task_payment(task.id())
        .await
        .expect("first round should succeed");
    assert!(!first.task_distributed);
    let second = harness
        .service
        .distribute_task_payment(task.id())
        .await
        .expect("second round should succeed");
    assert!(!second.task_distributed);

    let creates = harness.bridge.requests().expect("recorded requests");
    assert_eq!(creates.len(), 1);
    let entries = harness
        .store
        .entries_for_payment(payment.id())
        .await
        .expect("entries lookup");
    assert_eq!(
        entries.first().map(|entry| entry.status()),
        Some(SettlementStatus::Initiated)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn canceled_payout_reverts_and_retries_with_a_new_transaction() {
    let harness = harness();
    let task = paid_task();
    harness.tasks.insert_task(&task).expect("seed task");
    let participant = mobile_participant(task.id(), dec!(1));
    harness.tasks.insert_participant(&participant).expect("seed participant");
    let payment = received_payment(task.id(), dec!(0.02));
    harness.store.insert_payment(&payment).expect("seed payment");
    harness
        .bridge
        .set_payout_address(BRIDGE_PAYOUT_ADDRESS)
        .expect("configure bridge");

    // Round one: the bridge resolves but the on-chain forward fails.
    harness.direct.set_unavailable(true).expect("configure gateway");
    let first = harness
        .service
        .distribute_task_payment(task.id())
        .await
        .expect("first round should succeed");
    assert!(!first.task_distributed);

    // The provider cancels the stuck transaction before round two.
    harness
        .bridge
        .cancel_transaction("bridge-1")
        .expect("cancel transaction");
    let second = harness
        .service
        .distribute_task_payment(task.id())
        .await
        .expect("second round should succeed");
    assert!(!second.task_distributed);
    let entries = harness
        .store
        .entries_for_payment(payment.id())
        .await
        .expect("entries lookup");
    assert_eq!(
        entries.first().map(|entry| entry.status()),
        Some(SettlementStatus::Pending)
    );

    // Round three dispatches a fresh transaction and settles.
    harness.direct.set_unavailable(false).expect("configure gateway");
    let third = harness
        .service
        .distribute_task_payment(task.id())
        .await
        .expect("third round should succeed");
    assert!(third.task_distributed);
    let creates = harness.bridge.requests().expect("recorded requests");
    assert_eq!(creates.len(), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn settled_amount_above_the_expected_share_is_refused() {
    let harness = harness();
    let task = paid_task();
    harness.tasks.insert_task(&task).expect("seed task");
    let participant = mobile_participant(task.id(), dec!(0.5));
    harness.tasks.insert_participant(&participant).expect("seed participant");
    let payment = received_payment(task.id(), dec!(0.02));
    harness.store.insert_payment(&payment).expect("seed payment");
    harness
        .bridge
        .set_payout_address(BRIDGE_PAYOUT_ADDRESS)
        .expect("configure bridge");
    harness.bridge.set_input_amount(dec!(0.05)).expect("configure bridge");

    let outcome = harness
        .service
        .distribute_task_payment(task.id())
        .await
        .expect("distribution should succeed");

    assert!(!outcome.task_distributed);
    assert!(harness.direct.requests().expect("recorded requests").is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_discovered_address_blocks_the_forward() {
    let harness = harness();
    let task = paid_task();
    harness.tasks.insert_task(&task).expect("seed task");
    let participant = mobile_participant(task.id(), dec!(1));
    harness.tasks.insert_participant(&participant).expect("seed participant");
    let payment = received_payment(task.id(), dec!(0.02));
    harness.store.insert_payment(&payment).expect("seed payment");
    harness
        .bridge
        .set_payout_address("not-a-btc-address")
        .expect("configure bridge");

    let outcome = harness
        .service
        .distribute_task_payment(task.id())
        .await
        .expect("distribution should succeed");

    assert!(!outcome.task_distributed);
    assert!(harness.direct.requests().expect("recorded requests").is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_bridge_creation_leaves_the_share_pending() {
    let harness = harness();
    let task = paid_task();
    harness.tasks.insert_task(&task).expect("seed task");
    let participant = mobile_participant(task.id(), dec!(1));
    harness.tasks.insert_participant(&participant).expect("seed participant");
    let payment = received_payment(task.id(), dec!(0.02));
    harness.store.insert_payment(&payment).expect("seed payment");
    harness.bridge.reject_creates(true).expect("configure bridge");

    let outcome = harness
        .service
        .distribute_task_payment(task.id())
        .await
        .expect("distribution should succeed");

    assert!(!outcome.task_distributed);
    let entries = harness
        .store
        .entries_for_payment(payment.id())
        .await
        .expect("entries lookup");
    assert_eq!(
        entries.first().map(|entry| entry.status()),
        Some(SettlementStatus::Pending)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn foreign_callback_is_ignored() {
    let harness = harness();
    let transaction = BridgeTransaction {
        id: "bridge-unknown".to_owned(),
        state: BridgeState::Approved,
        metadata: BridgeMetadata {
            reference: "not-a-ledger-entry".to_owned(),
            idem_key: "nonce".to_owned(),
        },
        input_amount: dec!(0.01),
        payin_methods: vec![PayinMethod {
            in_details: json!({}),
            out_details: json!({ "bitcoin_address": BRIDGE_PAYOUT_ADDRESS }),
        }],
    };

    let settled = harness
        .service
        .complete_bridge_settlement(&transaction)
        .await
        .expect("completion should succeed");

    assert!(!settled);
    assert!(harness.direct.requests().expect("recorded requests").is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn mixed_rails_settle_within_one_round() {
    let harness = harness();
    let task = paid_task();
    harness.tasks.insert_task(&task).expect("seed task");
    let on_chain = direct_participant(task.id(), dec!(0.5));
    let mobile = mobile_participant(task.id(), dec!(0.5));
    harness.tasks.insert_participant(&on_chain).expect("seed participant");
    harness.tasks.insert_participant(&mobile).expect("seed participant");
    let payment = received_payment(task.id(), dec!(0.04));
    harness.store.insert_payment(&payment).expect("seed payment");
    harness
        .bridge
        .set_payout_address(BRIDGE_PAYOUT_ADDRESS)
        .expect("configure bridge");

    let outcome = harness
        .service
        .distribute_task_payment(task.id())
        .await
        .expect("distribution should succeed");

    assert!(outcome.task_distributed);
    // One direct share send plus one bridge forward.
    let sends = harness.direct.requests().expect("recorded requests");
    assert_eq!(sends.len(), 2);
    let creates = harness.bridge.requests().expect("recorded requests");
    assert_eq!(creates.len(), 1);
}
