//! # Domain Records
//!
//! The versioned entities of the point-of-sale: menu items with stock
//! counters, customers with a running balance ledger, and sale records.
//! Every mutating write against these goes through a version-guarded
//! conditional mutation; the types here only describe shape and carry no
//! store logic.

pub mod customer;
pub mod ledger;
pub mod menu_item;
pub mod order;
pub mod sale;

pub use customer::{Customer, BALANCE_FIELD};
pub use ledger::{Direction, LedgerEntry};
pub use menu_item::{MenuItem, Stock, SOLD_COUNT_FIELD, STOCK_FIELD, UNLIMITED_STOCK};
pub use order::{Order, OrderLine, PaymentMethod, PaymentPart};
pub use sale::{Sale, IS_REFUNDED_FIELD};

/// Collection names in the backing store.
pub mod collections {
    /// Menu items with stock counters
    pub const MENU_ITEMS: &str = "menu_items";
    /// Customer accounts with running balances
    pub const CUSTOMERS: &str = "customers";
    /// Confirmed sales
    pub const SALES: &str = "sales";
    /// Append-only balance ledger
    pub const LEDGER_ENTRIES: &str = "ledger_entries";
}
