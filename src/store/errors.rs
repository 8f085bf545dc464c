//! # Store Errors
//!
//! Error types surfaced by [`RecordStore`](super::RecordStore) implementations.

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors from the underlying record store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A mutation's condition predicate did not hold; nothing was applied
    #[error("condition failed for mutation {index}: {reason}")]
    ConditionFailed {
        /// Position of the failing mutation in the submitted list
        index: usize,
        /// Store-side description of the failed predicate
        reason: String,
    },

    /// The mutation list exceeds the store's hard per-operation limit
    #[error("{count} mutations exceed the store limit of {limit}")]
    TooManyMutations { count: usize, limit: usize },

    /// The store could not be reached or refused service
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A record or mutation the store could not interpret
    #[error("malformed record: {0}")]
    Malformed(String),
}

impl StoreError {
    /// Create a condition failure for the mutation at `index`.
    pub fn condition_failed(index: usize, reason: impl Into<String>) -> Self {
        Self::ConditionFailed {
            index,
            reason: reason.into(),
        }
    }
}
