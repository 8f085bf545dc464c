//! Balance Ledger Tests
//!
//! Deposits and withdrawals move the running balance and the append-only
//! ledger in one atomic commit:
//! - a deposit credits the balance and appends exactly one entry
//! - an overdraw fails at the store and appends nothing
//! - two withdrawals from the same snapshot: one wins on the version guard

use std::sync::Arc;

use tillcore::assembler::{assemble_deposit, assemble_withdrawal};
use tillcore::commit::{CommitConfig, CommitCoordinator, CommitError};
use tillcore::domain::{collections, Customer};
use tillcore::store::MemoryStore;

fn seed_customer(store: &MemoryStore, customer: &Customer) {
    store.put(
        collections::CUSTOMERS,
        &customer.key(),
        serde_json::to_value(customer).unwrap(),
    );
}

fn read_customer(store: &MemoryStore, customer: &Customer) -> Customer {
    serde_json::from_value(
        store
            .snapshot(collections::CUSTOMERS, &customer.key())
            .unwrap(),
    )
    .unwrap()
}

fn coordinator(store: &Arc<MemoryStore>) -> CommitCoordinator {
    CommitCoordinator::new(store.clone(), CommitConfig::default())
}

// =============================================================================
// Deposit Tests
// =============================================================================

/// A deposit credits the balance and appends one ledger entry.
#[tokio::test]
async fn test_deposit_moves_balance_and_ledger_together() {
    let store = Arc::new(MemoryStore::new());
    let customer = Customer::new("Ada");
    seed_customer(&store, &customer);
    let coord = coordinator(&store);

    let plan = assemble_deposit(&customer, 500).unwrap();
    coord.commit(plan.mutations).await.unwrap();

    let after = read_customer(&store, &customer);
    assert_eq!(after.balance, 500);
    assert_eq!(after.version, 2);
    assert_eq!(store.len(collections::LEDGER_ENTRIES), 1);

    let stored = store
        .snapshot(collections::LEDGER_ENTRIES, &plan.ledger_entry.key())
        .unwrap();
    assert_eq!(stored["direction"], "credit");
    assert_eq!(stored["amount"], 500);
}

// =============================================================================
// Withdrawal Tests
// =============================================================================

/// A withdrawal within the credit floor debits the balance.
#[tokio::test]
async fn test_withdrawal_within_floor_succeeds() {
    let store = Arc::new(MemoryStore::new());
    let mut customer = Customer::new("Ada").with_credit_limit(100);
    customer.balance = 50;
    seed_customer(&store, &customer);
    let coord = coordinator(&store);

    let plan = assemble_withdrawal(&customer, 120).unwrap();
    coord.commit(plan.mutations).await.unwrap();

    let after = read_customer(&store, &customer);
    assert_eq!(after.balance, -70);
    assert_eq!(store.len(collections::LEDGER_ENTRIES), 1);
}

/// An overdraw fails at the store; neither balance nor ledger moves.
#[tokio::test]
async fn test_overdraw_fails_and_appends_nothing() {
    let store = Arc::new(MemoryStore::new());
    let mut customer = Customer::new("Ada");
    customer.balance = 50;
    seed_customer(&store, &customer);
    let coord = coordinator(&store);

    let plan = assemble_withdrawal(&customer, 60).unwrap();
    let err = coord.commit(plan.mutations).await.unwrap_err();

    assert!(matches!(err, CommitError::ConditionFailed { index: 0, .. }));
    let after = read_customer(&store, &customer);
    assert_eq!(after.balance, 50);
    assert_eq!(after.version, 1);
    assert_eq!(store.len(collections::LEDGER_ENTRIES), 0);
}

// =============================================================================
// Version Race Tests
// =============================================================================

/// Two withdrawals assembled from the same snapshot: the version guard
/// lets exactly one through.
#[tokio::test]
async fn test_concurrent_withdrawals_one_wins() {
    let store = Arc::new(MemoryStore::new());
    let mut customer = Customer::new("Ada");
    customer.balance = 100;
    seed_customer(&store, &customer);
    let coord = coordinator(&store);

    let first = assemble_withdrawal(&customer, 80).unwrap();
    let second = assemble_withdrawal(&customer, 80).unwrap();

    let (a, b) = tokio::join!(coord.commit(first.mutations), coord.commit(second.mutations));

    assert_eq!([&a, &b].iter().filter(|r| r.is_ok()).count(), 1);

    // Had both applied, the balance would be -60 against a floor of 0
    let after = read_customer(&store, &customer);
    assert_eq!(after.balance, 20);
    assert_eq!(after.version, 2);
    assert_eq!(store.len(collections::LEDGER_ENTRIES), 1);
}
