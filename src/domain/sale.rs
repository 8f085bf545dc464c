//! # Sale Records
//!
//! A sale is created once when an order is confirmed and is immutable
//! afterwards except for the one-way `is_refunded` transition. The refund
//! mutation enforces that transition with a store-side predicate so
//! concurrent refund attempts cannot both apply.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::order::{Order, OrderLine, PaymentMethod, PaymentPart};

/// Field name of the refund flag.
pub const IS_REFUNDED_FIELD: &str = "is_refunded";

/// A confirmed sale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    /// Unique sale identifier
    pub id: Uuid,

    /// Order this sale confirmed
    pub order_id: Uuid,

    /// Lines as sold
    pub lines: Vec<OrderLine>,

    /// Payment breakdown; sums to the sale total
    pub payments: Vec<PaymentPart>,

    /// Customer the sale belongs to, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<Uuid>,

    /// One-way refund flag
    pub is_refunded: bool,

    /// When the sale was confirmed
    pub created_at: DateTime<Utc>,

    /// Optimistic-concurrency version stamp
    pub version: u64,
}

impl Sale {
    /// Build the sale record confirming `order` with the given breakdown.
    pub fn confirm(order: &Order, payments: Vec<PaymentPart>) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id: order.id,
            lines: order.lines.clone(),
            payments,
            customer_id: order.customer_id,
            is_refunded: false,
            created_at: Utc::now(),
            version: 1,
        }
    }

    /// Sale total in minor currency units.
    pub fn total(&self) -> i64 {
        self.lines.iter().map(OrderLine::total).sum()
    }

    /// Portion of the payment drawn from the customer's balance.
    pub fn credit_amount(&self) -> i64 {
        self.payments
            .iter()
            .filter(|p| p.method == PaymentMethod::CustomerCredit)
            .map(|p| p.amount)
            .sum()
    }

    /// Store key for this sale.
    pub fn key(&self) -> String {
        self.id.to_string()
    }
}
