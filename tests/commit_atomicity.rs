//! Commit Coordinator Atomicity Tests
//!
//! A bounded commit either applies every mutation or none, verified by
//! reading the store directly after each attempt:
//! - all-or-nothing application
//! - oversize commits fail fast without touching the store
//! - retry with stale versions never double-applies

use std::sync::Arc;

use serde_json::json;
use tillcore::commit::{CommitConfig, CommitCoordinator, CommitError};
use tillcore::store::{Condition, MemoryStore, Mutation, UpdateExpr};

fn coordinator(store: &Arc<MemoryStore>) -> CommitCoordinator {
    CommitCoordinator::new(store.clone(), CommitConfig::default())
}

// =============================================================================
// All-or-Nothing Tests
// =============================================================================

/// A fully valid list applies every mutation.
#[tokio::test]
async fn test_valid_commit_applies_all_mutations() {
    let store = Arc::new(MemoryStore::new());
    store.put("menu_items", "m1", json!({"stock": 5, "version": 1}));
    let coord = coordinator(&store);

    coord
        .commit(vec![
            Mutation::update(
                "menu_items",
                "m1",
                UpdateExpr::new().increment("stock", -2).increment("version", 1),
                vec![Condition::version_is(1)],
            ),
            Mutation::create("sales", "s1", json!({"total": 700, "version": 1})),
        ])
        .await
        .unwrap();

    assert_eq!(store.snapshot("menu_items", "m1").unwrap()["stock"], 3);
    assert_eq!(store.snapshot("sales", "s1").unwrap()["total"], 700);
}

/// One failing condition leaves every record untouched.
#[tokio::test]
async fn test_failing_condition_applies_nothing() {
    let store = Arc::new(MemoryStore::new());
    store.put("menu_items", "m1", json!({"stock": 5, "version": 1}));
    store.put("customers", "c1", json!({"balance": 100, "version": 1}));
    let coord = coordinator(&store);

    let err = coord
        .commit(vec![
            Mutation::update(
                "menu_items",
                "m1",
                UpdateExpr::new().increment("stock", -1),
                vec![Condition::version_is(1)],
            ),
            Mutation::create("sales", "s1", json!({})),
            // Fails: balance floor not met
            Mutation::update(
                "customers",
                "c1",
                UpdateExpr::new().increment("balance", -500),
                vec![Condition::field_at_least("balance", 500)],
            ),
        ])
        .await
        .unwrap_err();

    assert!(matches!(err, CommitError::ConditionFailed { index: 2, .. }));
    assert_eq!(store.snapshot("menu_items", "m1").unwrap()["stock"], 5);
    assert_eq!(store.snapshot("customers", "c1").unwrap()["balance"], 100);
    assert!(store.snapshot("sales", "s1").is_none());
}

// =============================================================================
// Ceiling Tests
// =============================================================================

/// An oversize list is rejected before any network call.
#[tokio::test]
async fn test_oversize_commit_leaves_store_untouched() {
    let store = Arc::new(MemoryStore::new());
    let coord = coordinator(&store);

    let mutations: Vec<Mutation> = (0..21)
        .map(|i| Mutation::create("records", format!("r{}", i), json!({})))
        .collect();

    let err = coord.commit(mutations).await.unwrap_err();

    assert_eq!(
        err,
        CommitError::TooLarge {
            count: 21,
            ceiling: 20
        }
    );
    assert_eq!(store.transact_calls(), 0);
    assert_eq!(store.len("records"), 0);
}

/// A list exactly at the ceiling goes through.
#[tokio::test]
async fn test_commit_at_ceiling_is_accepted() {
    let store = Arc::new(MemoryStore::new());
    let coord = coordinator(&store);

    let mutations: Vec<Mutation> = (0..20)
        .map(|i| Mutation::create("records", format!("r{}", i), json!({})))
        .collect();

    coord.commit(mutations).await.unwrap();
    assert_eq!(store.len("records"), 20);
    assert_eq!(store.transact_calls(), 1);
}

/// An empty list is a success with no store contact.
#[tokio::test]
async fn test_empty_commit_is_noop() {
    let store = Arc::new(MemoryStore::new());
    let coord = coordinator(&store);

    coord.commit(Vec::new()).await.unwrap();
    assert_eq!(store.transact_calls(), 0);
}

// =============================================================================
// Retry Tests
// =============================================================================

/// Resubmitting an applied commit with now-stale versions fails with a
/// condition mismatch instead of double-applying.
#[tokio::test]
async fn test_stale_retry_never_double_applies() {
    let store = Arc::new(MemoryStore::new());
    store.put("menu_items", "m1", json!({"stock": 5, "version": 1}));
    let coord = coordinator(&store);

    let mutations = vec![Mutation::update(
        "menu_items",
        "m1",
        UpdateExpr::new().increment("stock", -2).increment("version", 1),
        vec![Condition::version_is(1)],
    )];

    coord.commit(mutations.clone()).await.unwrap();
    let err = coord.commit(mutations).await.unwrap_err();

    assert!(matches!(err, CommitError::ConditionFailed { .. }));
    assert_eq!(store.snapshot("menu_items", "m1").unwrap()["stock"], 3);
}

/// A transient fault is retryable as-is; the retry applies exactly once.
#[tokio::test]
async fn test_transient_fault_then_retry_succeeds() {
    let store = Arc::new(MemoryStore::new());
    store.put("menu_items", "m1", json!({"stock": 5, "version": 1}));
    let coord = coordinator(&store);

    let mutations = vec![Mutation::update(
        "menu_items",
        "m1",
        UpdateExpr::new().increment("stock", -1).increment("version", 1),
        vec![Condition::version_is(1)],
    )];

    store.set_unavailable(true);
    let err = coord.commit(mutations.clone()).await.unwrap_err();
    assert!(err.is_retryable());
    assert_eq!(store.snapshot("menu_items", "m1").unwrap()["stock"], 5);

    store.set_unavailable(false);
    coord.commit(mutations).await.unwrap();
    assert_eq!(store.snapshot("menu_items", "m1").unwrap()["stock"], 4);
}
