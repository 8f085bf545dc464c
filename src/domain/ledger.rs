//! # Balance Ledger
//!
//! Immutable append records for every movement on a customer balance. A
//! customer's true balance is the signed sum of their entries; the running
//! balance on the customer record is a maintained copy, corrected by the
//! maintenance backfill if it ever drifts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of a ledger movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Money into the account (deposit, refund compensation)
    Credit,
    /// Money out of the account (withdrawal, credit sale)
    Debit,
}

/// One immutable balance movement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Unique entry identifier
    pub id: Uuid,

    /// Account the movement belongs to
    pub customer_id: Uuid,

    /// Always positive; `direction` carries the sign
    pub amount: i64,

    /// Whether the movement credits or debits the account
    pub direction: Direction,

    /// Sale that caused the movement, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_sale_id: Option<Uuid>,

    /// When the entry was written
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// New credit entry.
    pub fn credit(customer_id: Uuid, amount: i64, related_sale_id: Option<Uuid>) -> Self {
        Self::new(customer_id, amount, Direction::Credit, related_sale_id)
    }

    /// New debit entry.
    pub fn debit(customer_id: Uuid, amount: i64, related_sale_id: Option<Uuid>) -> Self {
        Self::new(customer_id, amount, Direction::Debit, related_sale_id)
    }

    fn new(
        customer_id: Uuid,
        amount: i64,
        direction: Direction,
        related_sale_id: Option<Uuid>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer_id,
            amount,
            direction,
            related_sale_id,
            created_at: Utc::now(),
        }
    }

    /// The movement as a signed amount: credits positive, debits negative.
    pub fn signed_amount(&self) -> i64 {
        match self.direction {
            Direction::Credit => self.amount,
            Direction::Debit => -self.amount,
        }
    }

    /// Store key for this entry.
    pub fn key(&self) -> String {
        self.id.to_string()
    }
}
