//! # Menu Items
//!
//! A menu item carries the stock counter that concurrent sales race on.
//! Stock is either a non-negative count or unlimited; unlimited is stored
//! as the `-1` sentinel so the store-side predicates can test it.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored sentinel for untracked stock.
pub const UNLIMITED_STOCK: i64 = -1;

/// Field name of the stock counter.
pub const STOCK_FIELD: &str = "stock";

/// Field name of the lifetime sold counter.
pub const SOLD_COUNT_FIELD: &str = "sold_count";

/// Stock counter: a bounded count or unlimited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum Stock {
    /// Tracked stock with `n` units remaining
    Limited(u32),
    /// Untracked stock; sales never decrement
    Unlimited,
}

impl Stock {
    /// Whether stock is untracked.
    pub fn is_unlimited(&self) -> bool {
        matches!(self, Self::Unlimited)
    }

    /// Whether `quantity` units can currently be sold.
    pub fn available(&self, quantity: u32) -> bool {
        match self {
            Self::Unlimited => true,
            Self::Limited(n) => *n >= quantity,
        }
    }
}

impl From<i64> for Stock {
    fn from(raw: i64) -> Self {
        if raw < 0 {
            Self::Unlimited
        } else {
            Self::Limited(raw.min(i64::from(u32::MAX)) as u32)
        }
    }
}

impl From<Stock> for i64 {
    fn from(stock: Stock) -> Self {
        match stock {
            Stock::Limited(n) => i64::from(n),
            Stock::Unlimited => UNLIMITED_STOCK,
        }
    }
}

/// A sellable menu item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    /// Unique item identifier
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Unit price in minor currency units
    pub unit_price: i64,

    /// Remaining stock
    pub stock: Stock,

    /// Lifetime units sold; not reduced by refunds
    pub sold_count: u64,

    /// Optimistic-concurrency version stamp
    pub version: u64,
}

impl MenuItem {
    /// Create a new item at version 1 with nothing sold.
    pub fn new(name: impl Into<String>, unit_price: i64, stock: Stock) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            unit_price,
            stock,
            sold_count: 0,
            version: 1,
        }
    }

    /// Store key for this item.
    pub fn key(&self) -> String {
        self.id.to_string()
    }
}
