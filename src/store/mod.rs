//! # Record Store Interface
//!
//! The keyed record store the commit layer runs against. Records are JSON
//! documents addressed by collection name and string key. The only write
//! path is `transact`: an all-or-nothing submission of a bounded mutation
//! list where every mutation carries its own condition predicates.
//!
//! The production deployment binds a networked store behind this trait;
//! [`MemoryStore`] provides the same conditional-commit semantics in
//! process for tests and local development.

pub mod condition;
pub mod errors;
pub mod memory;
pub mod mutation;

pub use condition::{Condition, VERSION_FIELD};
pub use errors::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use mutation::{Mutation, UpdateAction, UpdateExpr};

use std::future::Future;
use std::pin::Pin;

use serde_json::Value;

/// Boxed future returned by store methods.
///
/// Keeps [`RecordStore`] object-safe so callers can hold `Arc<dyn RecordStore>`.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = StoreResult<T>> + Send + 'a>>;

/// A keyed record store supporting conditional writes.
pub trait RecordStore: Send + Sync {
    /// Read a single record by key.
    fn get(&self, collection: &str, key: &str) -> StoreFuture<'_, Option<Value>>;

    /// Apply a mutation list as one all-or-nothing operation.
    ///
    /// Either every mutation's preconditions hold and all records are
    /// applied, or nothing is. The list is bounded by
    /// [`max_transact_items`](Self::max_transact_items).
    fn transact(&self, mutations: Vec<Mutation>) -> StoreFuture<'_, ()>;

    /// Return every record in a collection. Maintenance tooling only.
    fn scan(&self, collection: &str) -> StoreFuture<'_, Vec<Value>>;

    /// The store's hard per-`transact` mutation limit.
    fn max_transact_items(&self) -> usize;
}
