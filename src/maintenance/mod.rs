//! # Maintenance Tooling
//!
//! Bulk operations over the batch executor. These accept partial-failure
//! semantics by design: a run may apply some chunks and not others, and
//! is written to be safely re-run until it converges. Business
//! transactions never go through this module.

use std::collections::HashMap;

use serde_json::Value;
use uuid::Uuid;

use crate::commit::{BatchExecutor, BatchOutcome};
use crate::domain::{collections, Customer, LedgerEntry, BALANCE_FIELD};
use crate::observability::Logger;
use crate::store::{Mutation, RecordStore, StoreError, StoreResult, UpdateExpr};

/// Result of one backfill run
#[derive(Debug, Clone)]
pub struct BackfillReport {
    /// Customers examined
    pub customers_scanned: usize,

    /// Customers whose running balance disagreed with their ledger
    pub corrections: usize,

    /// Chunk-level outcome of submitting the corrections
    pub outcome: BatchOutcome,
}

impl BackfillReport {
    /// Whether every correction applied. A `false` here means the run is
    /// partially applied and must be re-run.
    pub fn is_complete(&self) -> bool {
        self.outcome.is_complete()
    }
}

/// Recompute every customer's running balance from the ledger and correct
/// the drifted ones through the batch executor.
///
/// Corrections are version-guarded, so a customer written concurrently
/// fails its chunk rather than being clobbered; the next run re-reads and
/// converges. Reconciliation after a partial outcome is exactly that:
/// run again.
pub async fn rebuild_running_balances(
    store: &dyn RecordStore,
    executor: &BatchExecutor,
) -> StoreResult<BackfillReport> {
    let mut totals: HashMap<Uuid, i64> = HashMap::new();
    for raw in store.scan(collections::LEDGER_ENTRIES).await? {
        let entry = decode::<LedgerEntry>(raw)?;
        *totals.entry(entry.customer_id).or_insert(0) += entry.signed_amount();
    }

    let mut customers_scanned = 0;
    let mut mutations = Vec::new();
    for raw in store.scan(collections::CUSTOMERS).await? {
        let customer = decode::<Customer>(raw)?;
        customers_scanned += 1;

        let expected = totals.get(&customer.id).copied().unwrap_or(0);
        if customer.balance != expected {
            mutations.push(Mutation::update_versioned(
                collections::CUSTOMERS,
                customer.key(),
                customer.version,
                UpdateExpr::new().set(BALANCE_FIELD, expected),
                Vec::new(),
            ));
        }
    }

    let corrections = mutations.len();
    let outcome = executor.commit_batches(mutations).await;

    let scanned_s = customers_scanned.to_string();
    let corrections_s = corrections.to_string();
    if outcome.is_complete() {
        Logger::info(
            "BACKFILL_COMPLETE",
            &[("corrections", &corrections_s), ("customers", &scanned_s)],
        );
    } else {
        let failed_s = outcome.failed_chunks.len().to_string();
        Logger::warn(
            "BACKFILL_PARTIAL",
            &[
                ("corrections", &corrections_s),
                ("customers", &scanned_s),
                ("failed_chunks", &failed_s),
            ],
        );
    }

    Ok(BackfillReport {
        customers_scanned,
        corrections,
        outcome,
    })
}

fn decode<T: serde::de::DeserializeOwned>(raw: Value) -> StoreResult<T> {
    serde_json::from_value(raw).map_err(|e| StoreError::Malformed(e.to_string()))
}
