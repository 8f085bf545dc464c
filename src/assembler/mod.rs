//! # Transaction Assemblers
//!
//! One assembler per business workflow: sale confirmation, refund, and
//! customer balance adjustment. An assembler turns freshly-read entity
//! snapshots plus a validated business intent into the full mutation list
//! for one atomic commit, including every condition predicate that
//! encodes optimistic locking and the business invariants (sufficient
//! stock, sufficient balance, not already refunded).
//!
//! Assemblers are pure: they never touch the store. They are also the only
//! code allowed to know the shape of a complete business transaction, and
//! they always target the commit coordinator; an intent too large for one
//! atomic commit is rejected here, never silently batched.

pub mod balance;
pub mod errors;
pub mod refund;
pub mod sale;

pub use balance::{assemble_deposit, assemble_withdrawal, BalancePlan};
pub use errors::{AssemblyError, AssemblyResult};
pub use refund::{assemble_refund, RefundPlan};
pub use sale::{assemble_sale, SaleConflict, SalePlan};

use serde::Serialize;
use serde_json::Value;

use crate::domain::{Customer, BALANCE_FIELD};
use crate::store::Condition;

/// Serialize a domain record into its stored form.
pub(crate) fn to_record<T: Serialize>(value: &T) -> AssemblyResult<Value> {
    serde_json::to_value(value).map_err(|e| AssemblyError::Serialization(e.to_string()))
}

/// Credit-floor predicate for debiting `amount` from a customer:
/// `balance - amount >= -credit_limit`.
pub(crate) fn debit_guard(customer: &Customer, amount: i64) -> Condition {
    Condition::field_at_least(BALANCE_FIELD, amount - customer.credit_limit)
}
