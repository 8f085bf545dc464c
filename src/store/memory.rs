//! # In-Memory Record Store
//!
//! [`RecordStore`] implementation with full conditional-transact semantics:
//! every condition in the mutation list is checked against current state
//! under one write lock, and nothing is applied unless all of them hold.
//!
//! Used by tests and local development. The transact-call counter and the
//! fault switch exist so tests can assert "no store call happened" and
//! exercise transient-error paths exactly.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::RwLock;

use serde_json::Value;

use super::errors::{StoreError, StoreResult};
use super::mutation::Mutation;
use super::{RecordStore, StoreFuture};

/// Hard per-transact limit, mirroring a typical networked record store.
pub const DEFAULT_TRANSACT_LIMIT: usize = 25;

type Collections = HashMap<String, HashMap<String, Value>>;

/// In-memory conditional-write store
pub struct MemoryStore {
    data: RwLock<Collections>,
    transact_calls: AtomicU64,
    unavailable: AtomicBool,
    transact_limit: usize,
}

impl MemoryStore {
    /// Create an empty store with the default transact limit.
    pub fn new() -> Self {
        Self::with_transact_limit(DEFAULT_TRANSACT_LIMIT)
    }

    /// Create an empty store with a custom transact limit.
    pub fn with_transact_limit(transact_limit: usize) -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
            transact_calls: AtomicU64::new(0),
            unavailable: AtomicBool::new(false),
            transact_limit,
        }
    }

    /// Number of `transact` calls received, including rejected ones.
    pub fn transact_calls(&self) -> u64 {
        self.transact_calls.load(Ordering::Relaxed)
    }

    /// Make every subsequent `transact` fail as unavailable until cleared.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::Relaxed);
    }

    /// Seed a record directly, bypassing conditions. Test setup only.
    pub fn put(&self, collection: &str, key: &str, record: Value) {
        let mut data = self.data.write().expect("store lock poisoned");
        data.entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), record);
    }

    /// Synchronous read of a record. Test assertions only.
    pub fn snapshot(&self, collection: &str, key: &str) -> Option<Value> {
        let data = self.data.read().expect("store lock poisoned");
        data.get(collection).and_then(|c| c.get(key)).cloned()
    }

    /// Number of records in a collection. Test assertions only.
    pub fn len(&self, collection: &str) -> usize {
        let data = self.data.read().expect("store lock poisoned");
        data.get(collection).map_or(0, HashMap::len)
    }

    fn check_and_apply(&self, mutations: &[Mutation]) -> StoreResult<()> {
        let mut data = self
            .data
            .write()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        // A key may appear at most once per transaction; anything else has
        // no well-defined validation order.
        let mut seen: HashSet<(&str, &str)> = HashSet::with_capacity(mutations.len());
        for mutation in mutations {
            if !seen.insert((mutation.collection(), mutation.key())) {
                return Err(StoreError::Malformed(format!(
                    "duplicate key {}/{} in transaction",
                    mutation.collection(),
                    mutation.key()
                )));
            }
        }

        // Validate everything against current state, staging the results;
        // only a fully valid list mutates the store.
        let mut staged: Vec<(&str, &str, Option<Value>)> = Vec::with_capacity(mutations.len());
        for (index, mutation) in mutations.iter().enumerate() {
            let current = data
                .get(mutation.collection())
                .and_then(|c| c.get(mutation.key()));

            match mutation {
                Mutation::Create {
                    collection,
                    key,
                    record,
                } => {
                    if current.is_some() {
                        return Err(StoreError::condition_failed(index, "record exists"));
                    }
                    staged.push((collection.as_str(), key.as_str(), Some(record.clone())));
                }
                Mutation::Update {
                    collection,
                    key,
                    expr,
                    conditions,
                } => {
                    let Some(current) = current else {
                        return Err(StoreError::condition_failed(index, "record does not exist"));
                    };
                    for condition in conditions {
                        if !condition.evaluate(Some(current)) {
                            return Err(StoreError::condition_failed(index, condition.describe()));
                        }
                    }
                    let mut next = current.clone();
                    expr.apply(&mut next).map_err(StoreError::Malformed)?;
                    staged.push((collection.as_str(), key.as_str(), Some(next)));
                }
                Mutation::Delete {
                    collection,
                    key,
                    conditions,
                } => {
                    for condition in conditions {
                        if !condition.evaluate(current) {
                            return Err(StoreError::condition_failed(index, condition.describe()));
                        }
                    }
                    staged.push((collection.as_str(), key.as_str(), None));
                }
            }
        }

        for (collection, key, record) in staged {
            match record {
                Some(record) => {
                    data.entry(collection.to_string())
                        .or_default()
                        .insert(key.to_string(), record);
                }
                None => {
                    if let Some(c) = data.get_mut(collection) {
                        c.remove(key);
                    }
                }
            }
        }

        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, collection: &str, key: &str) -> StoreFuture<'_, Option<Value>> {
        let collection = collection.to_string();
        let key = key.to_string();
        Box::pin(async move {
            let data = self
                .data
                .read()
                .map_err(|e| StoreError::Unavailable(e.to_string()))?;
            Ok(data.get(&collection).and_then(|c| c.get(&key)).cloned())
        })
    }

    fn transact(&self, mutations: Vec<Mutation>) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            self.transact_calls.fetch_add(1, Ordering::Relaxed);

            if self.unavailable.load(Ordering::Relaxed) {
                return Err(StoreError::Unavailable("injected fault".to_string()));
            }
            if mutations.len() > self.transact_limit {
                return Err(StoreError::TooManyMutations {
                    count: mutations.len(),
                    limit: self.transact_limit,
                });
            }

            self.check_and_apply(&mutations)
        })
    }

    fn scan(&self, collection: &str) -> StoreFuture<'_, Vec<Value>> {
        let collection = collection.to_string();
        Box::pin(async move {
            let data = self
                .data
                .read()
                .map_err(|e| StoreError::Unavailable(e.to_string()))?;

            let Some(records) = data.get(&collection) else {
                return Ok(Vec::new());
            };

            // Sort by key so scans are deterministic
            let mut entries: Vec<(&String, &Value)> = records.iter().collect();
            entries.sort_by_key(|(key, _)| key.as_str());
            Ok(entries.into_iter().map(|(_, v)| v.clone()).collect())
        })
    }

    fn max_transact_items(&self) -> usize {
        self.transact_limit
    }
}
