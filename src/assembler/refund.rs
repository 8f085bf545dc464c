//! # Refund Assembly
//!
//! Builds the single atomic commit that reverses a sale: the one-way
//! `is_refunded` flip guarded at the store so concurrent refund attempts
//! cannot both apply, a stock increment per tracked line, and, when the
//! sale drew on customer credit, a compensating balance credit plus
//! ledger entry. Stock is restored exactly once regardless of retries;
//! the lifetime sold counter is left alone.

use crate::commit::CommitConfig;
use crate::domain::{
    collections, Customer, LedgerEntry, MenuItem, Sale, BALANCE_FIELD, IS_REFUNDED_FIELD,
    STOCK_FIELD,
};
use crate::store::{Condition, Mutation, UpdateExpr};

use super::errors::{AssemblyError, AssemblyResult};
use super::to_record;

/// The assembled refund transaction
#[derive(Debug, Clone)]
pub struct RefundPlan {
    /// Compensating ledger entry for the credit portion, if any
    pub ledger_entry: Option<LedgerEntry>,

    /// Mutations in assembly order: sale flip, restocks, balance, ledger
    pub mutations: Vec<Mutation>,
}

/// Assemble the atomic commit refunding `sale`.
///
/// `items` are fresh snapshots of every menu item the sale references;
/// `customer` is required when the sale drew on customer credit. The
/// already-refunded case is not checked here: the commit's
/// `is_refunded == false` predicate rejects it race-safely at the store.
pub fn assemble_refund(
    sale: &Sale,
    items: &[MenuItem],
    customer: Option<&Customer>,
    config: &CommitConfig,
) -> AssemblyResult<RefundPlan> {
    let credit_amount = sale.credit_amount();
    let customer = match (credit_amount > 0, customer) {
        (true, None) => return Err(AssemblyError::MissingCustomer),
        (true, Some(customer)) => Some(customer),
        (false, _) => None,
    };

    // Resolve snapshots first; only tracked-stock lines emit a restock.
    let mut restocks: Vec<(&MenuItem, u32)> = Vec::with_capacity(sale.lines.len());
    for line in &sale.lines {
        let item = items
            .iter()
            .find(|i| i.id == line.menu_item_id)
            .ok_or(AssemblyError::MissingSnapshot(line.menu_item_id))?;
        if !item.stock.is_unlimited() {
            restocks.push((item, line.quantity));
        }
    }

    let required = 1 + restocks.len() + if customer.is_some() { 2 } else { 0 };
    if required > config.ceiling {
        return Err(AssemblyError::PlanTooLarge {
            required,
            ceiling: config.ceiling,
        });
    }

    let mut mutations = Vec::with_capacity(required);
    mutations.push(Mutation::update_versioned(
        collections::SALES,
        sale.key(),
        sale.version,
        UpdateExpr::new().set(IS_REFUNDED_FIELD, true),
        vec![Condition::field_equals(IS_REFUNDED_FIELD, false)],
    ));

    for (item, quantity) in restocks {
        mutations.push(Mutation::update_versioned(
            collections::MENU_ITEMS,
            item.key(),
            item.version,
            UpdateExpr::new().increment(STOCK_FIELD, i64::from(quantity)),
            Vec::new(),
        ));
    }

    let ledger_entry = match customer {
        Some(customer) => {
            mutations.push(Mutation::update_versioned(
                collections::CUSTOMERS,
                customer.key(),
                customer.version,
                UpdateExpr::new().increment(BALANCE_FIELD, credit_amount),
                Vec::new(),
            ));

            let entry = LedgerEntry::credit(customer.id, credit_amount, Some(sale.id));
            mutations.push(Mutation::create(
                collections::LEDGER_ENTRIES,
                entry.key(),
                to_record(&entry)?,
            ));
            Some(entry)
        }
        None => None,
    };

    Ok(RefundPlan {
        ledger_entry,
        mutations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Order, OrderLine, PaymentPart, Stock};

    fn confirmed_sale(item: &MenuItem, quantity: u32, payments: Vec<PaymentPart>) -> Sale {
        let order = Order::new(vec![OrderLine::new(item.id, quantity, item.unit_price)]);
        Sale::confirm(&order, payments)
    }

    #[test]
    fn test_refund_flips_sale_with_predicate() {
        let item = MenuItem::new("espresso", 350, Stock::Limited(8));
        let sale = confirmed_sale(&item, 2, vec![PaymentPart::cash(700)]);

        let plan = assemble_refund(
            &sale,
            &[item.clone()],
            None,
            &CommitConfig::default(),
        )
        .unwrap();

        assert_eq!(plan.mutations.len(), 2);

        let Mutation::Update {
            collection,
            conditions,
            ..
        } = &plan.mutations[0]
        else {
            panic!("expected update");
        };
        assert_eq!(collection, collections::SALES);
        assert!(conditions.contains(&Condition::field_equals(IS_REFUNDED_FIELD, false)));
    }

    #[test]
    fn test_unlimited_items_not_restocked() {
        let item = MenuItem::new("americano", 300, Stock::Unlimited);
        let sale = confirmed_sale(&item, 3, vec![PaymentPart::cash(900)]);

        let plan = assemble_refund(
            &sale,
            &[item],
            None,
            &CommitConfig::default(),
        )
        .unwrap();

        // Only the sale flip
        assert_eq!(plan.mutations.len(), 1);
    }

    #[test]
    fn test_credit_sale_gets_compensating_entry() {
        let item = MenuItem::new("espresso", 350, Stock::Limited(8));
        let customer = Customer::new("Ada");
        let sale = confirmed_sale(&item, 2, vec![PaymentPart::customer_credit(700)]);

        let plan = assemble_refund(
            &sale,
            &[item],
            Some(&customer),
            &CommitConfig::default(),
        )
        .unwrap();

        assert_eq!(plan.mutations.len(), 4);
        let entry = plan.ledger_entry.unwrap();
        assert_eq!(entry.signed_amount(), 700);
        assert_eq!(entry.related_sale_id, Some(sale.id));
    }

    #[test]
    fn test_credit_refund_without_customer_rejected() {
        let item = MenuItem::new("espresso", 350, Stock::Limited(8));
        let sale = confirmed_sale(&item, 1, vec![PaymentPart::customer_credit(350)]);

        let err = assemble_refund(&sale, &[item], None, &CommitConfig::default()).unwrap_err();
        assert_eq!(err, AssemblyError::MissingCustomer);
    }

    #[test]
    fn test_missing_snapshot_rejected() {
        let item = MenuItem::new("espresso", 350, Stock::Limited(8));
        let sale = confirmed_sale(&item, 1, vec![PaymentPart::cash(350)]);

        let err = assemble_refund(&sale, &[], None, &CommitConfig::default()).unwrap_err();
        assert_eq!(err, AssemblyError::MissingSnapshot(item.id));
    }
}
