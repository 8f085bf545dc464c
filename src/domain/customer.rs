//! # Customer Accounts
//!
//! A customer carries a running balance in minor currency units, maintained
//! as the signed sum of ledger entries and updated only in the same atomic
//! commit as the entry that changes it. `credit_limit` is how far below
//! zero the balance may go.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Field name of the running balance.
pub const BALANCE_FIELD: &str = "balance";

/// A customer account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Unique customer identifier
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Running balance in minor currency units
    pub balance: i64,

    /// Permitted overdraft; the balance may not drop below `-credit_limit`
    pub credit_limit: i64,

    /// Optimistic-concurrency version stamp
    pub version: u64,
}

impl Customer {
    /// Create a new customer with a zero balance and no credit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            balance: 0,
            credit_limit: 0,
            version: 1,
        }
    }

    /// Set the permitted overdraft.
    pub fn with_credit_limit(mut self, credit_limit: i64) -> Self {
        self.credit_limit = credit_limit;
        self
    }

    /// Whether a debit of `amount` keeps the balance above the floor.
    pub fn can_debit(&self, amount: i64) -> bool {
        self.balance - amount >= -self.credit_limit
    }

    /// Store key for this customer.
    pub fn key(&self) -> String {
        self.id.to_string()
    }
}
