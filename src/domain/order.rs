//! # Orders and Payments
//!
//! The pre-sale draft: what the till is about to confirm. Orders and
//! payment breakdowns arrive already validated by the caller (positive
//! quantities and amounts, known payment methods); the assembler verifies
//! only what crosses entity boundaries, such as the breakdown matching the
//! order total.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One order line: a quantity of one menu item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    /// Item being sold
    pub menu_item_id: Uuid,

    /// Units sold
    pub quantity: u32,

    /// Price per unit at sale time, in minor currency units
    pub unit_price: i64,
}

impl OrderLine {
    /// New order line.
    pub fn new(menu_item_id: Uuid, quantity: u32, unit_price: i64) -> Self {
        Self {
            menu_item_id,
            quantity,
            unit_price,
        }
    }

    /// Line total in minor currency units.
    pub fn total(&self) -> i64 {
        self.unit_price * i64::from(self.quantity)
    }
}

/// A draft order awaiting confirmation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Unique order identifier
    pub id: Uuid,

    /// Lines to confirm
    pub lines: Vec<OrderLine>,

    /// Customer the order belongs to, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<Uuid>,
}

impl Order {
    /// New anonymous order.
    pub fn new(lines: Vec<OrderLine>) -> Self {
        Self {
            id: Uuid::new_v4(),
            lines,
            customer_id: None,
        }
    }

    /// Attach a customer.
    pub fn for_customer(mut self, customer_id: Uuid) -> Self {
        self.customer_id = Some(customer_id);
        self
    }

    /// Order total in minor currency units.
    pub fn total(&self) -> i64 {
        self.lines.iter().map(OrderLine::total).sum()
    }
}

/// Accepted payment methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash at the till
    Cash,
    /// Card terminal
    Card,
    /// Drawn from the customer's account balance
    CustomerCredit,
}

/// One part of a payment breakdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentPart {
    /// How this part is paid
    pub method: PaymentMethod,

    /// Amount in minor currency units
    pub amount: i64,
}

impl PaymentPart {
    /// Cash part.
    pub fn cash(amount: i64) -> Self {
        Self {
            method: PaymentMethod::Cash,
            amount,
        }
    }

    /// Card part.
    pub fn card(amount: i64) -> Self {
        Self {
            method: PaymentMethod::Card,
            amount,
        }
    }

    /// Customer-credit part.
    pub fn customer_credit(amount: i64) -> Self {
        Self {
            method: PaymentMethod::CustomerCredit,
            amount,
        }
    }
}
