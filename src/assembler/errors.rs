//! # Assembly Errors
//!
//! Rejections raised while building a transaction, before anything is
//! sent to the store. Conflicts that depend on other writers (stale
//! versions, stock, balance, refund state) are deliberately not here:
//! those fail at the condition-predicate level so they stay race-safe.

use thiserror::Error;
use uuid::Uuid;

/// Result type for transaction assembly
pub type AssemblyResult<T> = Result<T, AssemblyError>;

/// Rejections during transaction assembly
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblyError {
    /// The order has no lines
    #[error("order has no lines")]
    EmptyOrder,

    /// The transaction needs more mutations than one atomic commit allows
    #[error("transaction needs {required} mutations, exceeding the atomic ceiling of {ceiling}")]
    PlanTooLarge { required: usize, ceiling: usize },

    /// The payment breakdown does not sum to the amount due
    #[error("payment breakdown totals {paid} but {due} is due")]
    PaymentMismatch { paid: i64, due: i64 },

    /// A customer-credit payment part with no customer attached
    #[error("payment uses customer credit but no customer is attached")]
    MissingCustomer,

    /// No snapshot was provided for a referenced menu item
    #[error("no snapshot provided for menu item {0}")]
    MissingSnapshot(Uuid),

    /// A monetary amount that must be positive was not
    #[error("amount must be positive, got {0}")]
    InvalidAmount(i64),

    /// A domain record failed to serialize into its stored form
    #[error("record serialization failed: {0}")]
    Serialization(String),
}
