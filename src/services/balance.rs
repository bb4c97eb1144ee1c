//! Balance computation
//!
//! The balance is never stored. It is derived on demand from the ledger:
//! deposits minus withdrawals, counting only what has taken place.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::error::{AccountingError, AccountingResult};
use crate::models::{Account, Balance};

use super::clock::Clock;
use super::transaction::TransactionService;

/// Service deriving balances from transactions
pub struct BalanceService<'a> {
    transactions: &'a TransactionService<'a>,
    clock: &'a dyn Clock,
}

impl<'a> BalanceService<'a> {
    pub fn new(transactions: &'a TransactionService<'a>, clock: &'a dyn Clock) -> Self {
        Self {
            transactions,
            clock,
        }
    }

    /// Balance of `account` as of now
    pub fn compute_balance(&self, account: &Account) -> AccountingResult<Balance> {
        self.compute_balance_at(account, self.clock.now())
    }

    /// Balance of `account` counting transactions at or before `instant`
    pub fn compute_balance_at(
        &self,
        account: &Account,
        instant: DateTime<Utc>,
    ) -> AccountingResult<Balance> {
        if account.is_deleted() {
            return Err(AccountingError::account_not_found(account.account_number));
        }

        let transactions = self.transactions.list(account)?;
        let completed: Vec<_> = transactions
            .iter()
            .filter(|txn| txn.occurred_by(instant))
            .collect();

        debug!(
            account_number = %account.account_number,
            total = transactions.len(),
            counted = completed.len(),
            %instant,
            "computing balance"
        );

        // Any partial sum of i64 amounts fits in i128, so only the total can overflow
        let total: i128 = completed
            .iter()
            .map(|txn| i128::from(txn.signed_amount()))
            .sum();
        let balance = i64::try_from(total)
            .map_err(|_| AccountingError::BalanceOverflow(account.account_number.to_string()))?;

        Ok(Balance::new(balance))
    }
}
