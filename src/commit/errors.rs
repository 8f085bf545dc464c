//! # Commit Errors
//!
//! The taxonomy callers branch on: `TooLarge` is a caller bug and never
//! reaches the store; `ConditionFailed` is an expected concurrency or
//! business-invariant conflict that needs a re-read and reassembly;
//! `Transient` is a transport fault that is safe to retry with fresh state.

use thiserror::Error;

use crate::store::StoreError;

/// Result type for commit operations
pub type CommitResult<T> = Result<T, CommitError>;

/// Errors from a single atomic commit
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommitError {
    /// Mutation count exceeds the ceiling; nothing was sent to the store
    #[error("commit of {count} mutations exceeds the ceiling of {ceiling}")]
    TooLarge { count: usize, ceiling: usize },

    /// A condition predicate was rejected; nothing was applied
    #[error("condition failed for mutation {index}: {reason}")]
    ConditionFailed {
        /// Position of the failing mutation in the committed list
        index: usize,
        /// Store-side description of the failed predicate
        reason: String,
    },

    /// Transport or store fault; retry only with freshly read versions
    #[error("transient store error: {0}")]
    Transient(String),
}

impl CommitError {
    /// Whether a caller may retry without re-reading state.
    ///
    /// Only transient faults qualify, and even then the commit may have
    /// applied: a retry with the same expected versions either applies the
    /// commit or fails with a condition mismatch, never double-applies.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

impl From<StoreError> for CommitError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ConditionFailed { index, reason } => {
                Self::ConditionFailed { index, reason }
            }
            // The ceiling sits below the store limit, so a store-side size
            // rejection means the ceiling is misconfigured; report it as
            // the same caller-facing class.
            StoreError::TooManyMutations { count, limit } => Self::TooLarge {
                count,
                ceiling: limit,
            },
            StoreError::Unavailable(msg) => Self::Transient(msg),
            StoreError::Malformed(msg) => Self::Transient(msg),
        }
    }
}
