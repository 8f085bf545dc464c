//! # Balance Adjustment Assembly
//!
//! Deposits and withdrawals against a customer account: one version-guarded
//! balance update (a withdrawal is additionally guarded by the credit
//! floor) plus one ledger-entry create, in one atomic commit.

use crate::domain::{collections, Customer, LedgerEntry, BALANCE_FIELD};
use crate::store::{Mutation, UpdateExpr};

use super::errors::{AssemblyError, AssemblyResult};
use super::{debit_guard, to_record};

/// The assembled balance adjustment
#[derive(Debug, Clone)]
pub struct BalancePlan {
    /// The ledger entry recording the movement
    pub ledger_entry: LedgerEntry,

    /// Mutations in assembly order: balance update, ledger entry
    pub mutations: Vec<Mutation>,
}

/// Assemble a deposit of `amount` onto `customer`'s balance.
pub fn assemble_deposit(customer: &Customer, amount: i64) -> AssemblyResult<BalancePlan> {
    if amount <= 0 {
        return Err(AssemblyError::InvalidAmount(amount));
    }

    let entry = LedgerEntry::credit(customer.id, amount, None);
    let mutations = vec![
        Mutation::update_versioned(
            collections::CUSTOMERS,
            customer.key(),
            customer.version,
            UpdateExpr::new().increment(BALANCE_FIELD, amount),
            Vec::new(),
        ),
        Mutation::create(collections::LEDGER_ENTRIES, entry.key(), to_record(&entry)?),
    ];

    Ok(BalancePlan {
        ledger_entry: entry,
        mutations,
    })
}

/// Assemble a withdrawal of `amount` from `customer`'s balance.
///
/// Carries the credit-floor predicate `balance - amount >= -credit_limit`
/// so an overdraw fails at the store, not by application check.
pub fn assemble_withdrawal(customer: &Customer, amount: i64) -> AssemblyResult<BalancePlan> {
    if amount <= 0 {
        return Err(AssemblyError::InvalidAmount(amount));
    }

    let entry = LedgerEntry::debit(customer.id, amount, None);
    let mutations = vec![
        Mutation::update_versioned(
            collections::CUSTOMERS,
            customer.key(),
            customer.version,
            UpdateExpr::new().increment(BALANCE_FIELD, -amount),
            vec![debit_guard(customer, amount)],
        ),
        Mutation::create(collections::LEDGER_ENTRIES, entry.key(), to_record(&entry)?),
    ];

    Ok(BalancePlan {
        ledger_entry: entry,
        mutations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Condition;

    #[test]
    fn test_deposit_shape() {
        let customer = Customer::new("Ada");
        let plan = assemble_deposit(&customer, 500).unwrap();

        assert_eq!(plan.mutations.len(), 2);
        assert_eq!(plan.ledger_entry.signed_amount(), 500);
        assert_eq!(plan.mutations[0].collection(), collections::CUSTOMERS);
        assert_eq!(plan.mutations[1].collection(), collections::LEDGER_ENTRIES);
    }

    #[test]
    fn test_withdrawal_carries_credit_floor() {
        let customer = Customer::new("Ada").with_credit_limit(200);
        let plan = assemble_withdrawal(&customer, 500).unwrap();

        let Mutation::Update { conditions, .. } = &plan.mutations[0] else {
            panic!("expected update");
        };
        // version guard plus balance >= amount - credit_limit
        assert_eq!(conditions.len(), 2);
        assert!(conditions.contains(&Condition::field_at_least(BALANCE_FIELD, 300)));
    }

    #[test]
    fn test_non_positive_amounts_rejected() {
        let customer = Customer::new("Ada");
        assert_eq!(
            assemble_deposit(&customer, 0).unwrap_err(),
            AssemblyError::InvalidAmount(0)
        );
        assert_eq!(
            assemble_withdrawal(&customer, -5).unwrap_err(),
            AssemblyError::InvalidAmount(-5)
        );
    }
}
