//! # Sale Confirmation Assembly
//!
//! Builds the single atomic commit that confirms an order: per line a
//! version-guarded stock decrement and sold-count increment on the menu
//! item, one create for the sale record, and, when any payment part draws
//! on customer credit, a version-guarded balance debit plus a ledger
//! entry. Orders needing more mutations than the ceiling are rejected
//! upstream of the store; sale confirmation is never batched.

use uuid::Uuid;

use crate::commit::CommitConfig;
use crate::domain::{
    collections, Customer, MenuItem, Order, PaymentMethod, PaymentPart, Sale, LedgerEntry,
    SOLD_COUNT_FIELD, STOCK_FIELD, UNLIMITED_STOCK,
};
use crate::store::{Condition, Mutation, UpdateExpr};

use super::errors::{AssemblyError, AssemblyResult};
use super::{debit_guard, to_record};

/// Sufficient-stock predicate: `stock >= quantity OR stock == UNLIMITED`.
fn stock_guard(quantity: u32) -> Condition {
    Condition::any_of(vec![
        Condition::field_at_least(STOCK_FIELD, i64::from(quantity)),
        Condition::field_equals(STOCK_FIELD, UNLIMITED_STOCK),
    ])
}

/// The assembled sale transaction: the records it will create and the
/// mutation list for one atomic commit.
#[derive(Debug, Clone)]
pub struct SalePlan {
    /// The sale record the commit creates
    pub sale: Sale,

    /// Ledger entry for the credit portion, if any
    pub ledger_entry: Option<LedgerEntry>,

    /// Mutations in assembly order: lines, sale, balance debit, ledger
    pub mutations: Vec<Mutation>,
}

/// Business-level reading of a commit's failing mutation index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaleConflict {
    /// A menu item's stock or version no longer matches the snapshot
    StockUnavailable { menu_item_id: Uuid },

    /// The sale key already exists in the store
    SaleAlreadyRecorded,

    /// The customer's balance or version no longer matches the snapshot
    InsufficientBalance,

    /// The ledger entry key collided
    LedgerConflict,
}

impl SalePlan {
    /// Map the failing index of a `ConditionFailed` commit error to the
    /// business conflict it represents, so callers can surface "stock no
    /// longer available" or "insufficient balance" instead of a generic
    /// failure.
    pub fn conflict_for(&self, index: usize) -> SaleConflict {
        let line_count = self.sale.lines.len();
        if index < line_count {
            SaleConflict::StockUnavailable {
                menu_item_id: self.sale.lines[index].menu_item_id,
            }
        } else if index == line_count {
            SaleConflict::SaleAlreadyRecorded
        } else if index == line_count + 1 {
            SaleConflict::InsufficientBalance
        } else {
            SaleConflict::LedgerConflict
        }
    }
}

/// Assemble the atomic commit confirming `order`.
///
/// `items` are fresh snapshots of every menu item the order references;
/// `customer` is required when any payment part uses customer credit.
/// Quantities and amounts arrive validated by the caller.
pub fn assemble_sale(
    order: &Order,
    payments: Vec<PaymentPart>,
    items: &[MenuItem],
    customer: Option<&Customer>,
    config: &CommitConfig,
) -> AssemblyResult<SalePlan> {
    if order.lines.is_empty() {
        return Err(AssemblyError::EmptyOrder);
    }

    let due = order.total();
    let paid: i64 = payments.iter().map(|p| p.amount).sum();
    if paid != due {
        return Err(AssemblyError::PaymentMismatch { paid, due });
    }

    let credit_amount: i64 = payments
        .iter()
        .filter(|p| p.method == PaymentMethod::CustomerCredit)
        .map(|p| p.amount)
        .sum();
    let customer = match (credit_amount > 0, customer) {
        (true, None) => return Err(AssemblyError::MissingCustomer),
        (true, Some(customer)) => Some(customer),
        (false, _) => None,
    };

    // Lines + sale create + (balance debit + ledger entry) must fit one
    // atomic commit; a larger order is rejected before any store call.
    let required = order.lines.len() + 1 + if customer.is_some() { 2 } else { 0 };
    if required > config.ceiling {
        return Err(AssemblyError::PlanTooLarge {
            required,
            ceiling: config.ceiling,
        });
    }

    let mut mutations = Vec::with_capacity(required);
    for line in &order.lines {
        let item = items
            .iter()
            .find(|i| i.id == line.menu_item_id)
            .ok_or(AssemblyError::MissingSnapshot(line.menu_item_id))?;

        let mut expr = UpdateExpr::new().increment(SOLD_COUNT_FIELD, i64::from(line.quantity));
        if !item.stock.is_unlimited() {
            expr = expr.increment(STOCK_FIELD, -i64::from(line.quantity));
        }

        mutations.push(Mutation::update_versioned(
            collections::MENU_ITEMS,
            item.key(),
            item.version,
            expr,
            vec![stock_guard(line.quantity)],
        ));
    }

    let sale = Sale::confirm(order, payments);
    mutations.push(Mutation::create(
        collections::SALES,
        sale.key(),
        to_record(&sale)?,
    ));

    let ledger_entry = match customer {
        Some(customer) => {
            mutations.push(Mutation::update_versioned(
                collections::CUSTOMERS,
                customer.key(),
                customer.version,
                UpdateExpr::new().increment(crate::domain::BALANCE_FIELD, -credit_amount),
                vec![debit_guard(customer, credit_amount)],
            ));

            let entry = LedgerEntry::debit(customer.id, credit_amount, Some(sale.id));
            mutations.push(Mutation::create(
                collections::LEDGER_ENTRIES,
                entry.key(),
                to_record(&entry)?,
            ));
            Some(entry)
        }
        None => None,
    };

    Ok(SalePlan {
        sale,
        ledger_entry,
        mutations,
    })
}
