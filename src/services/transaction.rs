//! Transaction service
//!
//! Records, edits and removes transactions on active accounts. Only
//! transactions that have not taken place yet may be deleted.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::{AccountingError, AccountingResult};
use crate::models::{Account, AccountNumber, Transaction, TransactionId, TransactionType};
use crate::storage::Storage;

use super::account::AccountService;
use super::clock::Clock;

/// Input for recording a transaction
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    pub account_number: AccountNumber,
    pub transaction_type: TransactionType,
    pub amount: i64,
    pub timestamp: DateTime<Utc>,
}

/// Input for replacing the mutable fields of a transaction
#[derive(Debug, Clone)]
pub struct UpdateTransactionInput {
    pub transaction_type: TransactionType,
    pub amount: i64,
    pub timestamp: DateTime<Utc>,
}

/// Service for the transaction ledger
pub struct TransactionService<'a> {
    storage: &'a Storage,
    accounts: &'a AccountService<'a>,
    clock: &'a dyn Clock,
}

impl<'a> TransactionService<'a> {
    pub fn new(storage: &'a Storage, accounts: &'a AccountService<'a>, clock: &'a dyn Clock) -> Self {
        Self {
            storage,
            accounts,
            clock,
        }
    }

    /// Record a transaction on an active account
    pub fn create(&self, input: CreateTransactionInput) -> AccountingResult<Transaction> {
        let account = self.target_account(input.account_number)?;

        let txn = Transaction::new(
            account.account_number,
            input.transaction_type,
            input.amount,
            input.timestamp,
        );
        txn.validate()
            .map_err(|e| AccountingError::validation(e.to_string()))?;

        self.storage.transactions.upsert(txn.clone())?;
        info!(account_number = %txn.account_number, id = %txn.id, "transaction created");
        debug!(transaction = %txn, "transaction saved");
        Ok(txn)
    }

    /// Transactions of an account, most recent first
    pub fn list(&self, account: &Account) -> AccountingResult<Vec<Transaction>> {
        if account.is_deleted() {
            return Err(AccountingError::account_not_found(account.account_number));
        }

        self.storage.transactions.get_by_account(account.account_number)
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> AccountingResult<Transaction> {
        self.storage
            .transactions
            .get(id)?
            .ok_or_else(|| AccountingError::transaction_not_found(id))
    }

    /// Replace type, amount and timestamp of a transaction
    ///
    /// The id and owning account never change. Nothing is written when the
    /// new values are invalid.
    pub fn update(
        &self,
        id: TransactionId,
        input: UpdateTransactionInput,
    ) -> AccountingResult<Transaction> {
        let txn = self
            .storage
            .transactions
            .update(id, |txn| {
                txn.transaction_type = input.transaction_type;
                txn.amount = input.amount;
                txn.timestamp = input.timestamp;
                txn.validate()
                    .map_err(|e| AccountingError::validation(e.to_string()))
            })?
            .ok_or_else(|| AccountingError::transaction_not_found(id))?;

        info!(account_number = %txn.account_number, id = %txn.id, "transaction updated");
        debug!(transaction = %txn, "transaction saved");
        Ok(txn)
    }

    /// Delete a transaction that has not taken place yet
    pub fn delete(&self, id: TransactionId) -> AccountingResult<Transaction> {
        let now = self.clock.now();
        let txn = self
            .storage
            .transactions
            .remove_if(id, |txn| {
                if txn.timestamp <= now {
                    debug!(%id, timestamp = %txn.timestamp, %now, "refusing to delete completed transaction");
                    return Err(AccountingError::AlreadyCompleted(
                        "Completed transaction cannot be deleted".into(),
                    ));
                }
                Ok(())
            })?
            .ok_or_else(|| AccountingError::transaction_not_found(id))?;

        info!(transaction = %txn, "transaction deleted");
        Ok(txn)
    }

    /// Resolve the account a new transaction is booked on
    fn target_account(&self, account_number: AccountNumber) -> AccountingResult<Account> {
        match self.accounts.get(account_number) {
            Ok(account) => Ok(account),
            Err(e) if e.is_not_found() => Err(AccountingError::UnprocessableTransaction(
                "Account is not active".into(),
            )),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::Fixture;
    use chrono::Duration;

    fn deposit(account: &Account, amount: i64, timestamp: DateTime<Utc>) -> CreateTransactionInput {
        CreateTransactionInput {
            account_number: account.account_number,
            transaction_type: TransactionType::Deposit,
            amount,
            timestamp,
        }
    }

    #[test]
    fn test_create_on_active_account() {
        let fx = Fixture::new();
        let accounts = fx.accounts();
        let ledger = TransactionService::new(&fx.storage, &accounts, &fx.clock);
        let account = fx.active_account(&accounts, "John Doe");

        let txn = ledger.create(deposit(&account, 1234, fx.now())).unwrap();

        assert_eq!(txn.account_number, account.account_number);
        assert_eq!(txn.transaction_type, TransactionType::Deposit);
        assert_eq!(txn.amount, 1234);
        assert_eq!(txn.timestamp, fx.now());
        assert_eq!(ledger.get(txn.id).unwrap(), txn);
    }

    #[test]
    fn test_create_on_prepared_account_is_unprocessable() {
        let fx = Fixture::new();
        let accounts = fx.accounts();
        let ledger = TransactionService::new(&fx.storage, &accounts, &fx.clock);
        let prepared = accounts.prepare("John Doe").unwrap();

        let result = ledger.create(deposit(&prepared, 10, fx.now()));
        match result {
            Err(AccountingError::UnprocessableTransaction(message)) => {
                assert_eq!(message, "Account is not active")
            }
            other => panic!("expected UnprocessableTransaction, got {:?}", other),
        }
        assert_eq!(fx.storage.transactions.count().unwrap(), 0);
    }

    #[test]
    fn test_create_on_deleted_or_unknown_account_is_unprocessable() {
        let fx = Fixture::new();
        let accounts = fx.accounts();
        let ledger = TransactionService::new(&fx.storage, &accounts, &fx.clock);

        let account = fx.active_account(&accounts, "John Doe");
        accounts.deactivate(account.account_number).unwrap();
        assert!(matches!(
            ledger.create(deposit(&account, 10, fx.now())),
            Err(AccountingError::UnprocessableTransaction(_))
        ));

        let unknown = CreateTransactionInput {
            account_number: AccountNumber::new(1234567812345678).unwrap(),
            transaction_type: TransactionType::Withdrawal,
            amount: 10,
            timestamp: fx.now(),
        };
        assert!(matches!(
            ledger.create(unknown),
            Err(AccountingError::UnprocessableTransaction(_))
        ));
    }

    #[test]
    fn test_create_rejects_non_positive_amounts() {
        let fx = Fixture::new();
        let accounts = fx.accounts();
        let ledger = TransactionService::new(&fx.storage, &accounts, &fx.clock);
        let account = fx.active_account(&accounts, "John Doe");

        for amount in [0, -1, -1000] {
            let err = ledger.create(deposit(&account, amount, fx.now())).unwrap_err();
            assert!(err.is_validation());
        }
        assert_eq!(fx.storage.transactions.count().unwrap(), 0);
    }

    #[test]
    fn test_future_timestamps_are_accepted() {
        let fx = Fixture::new();
        let accounts = fx.accounts();
        let ledger = TransactionService::new(&fx.storage, &accounts, &fx.clock);
        let account = fx.active_account(&accounts, "John Doe");

        let later = fx.now() + Duration::days(30);
        let txn = ledger.create(deposit(&account, 5, later)).unwrap();
        assert_eq!(txn.timestamp, later);
    }

    #[test]
    fn test_list_is_most_recent_first() {
        let fx = Fixture::new();
        let accounts = fx.accounts();
        let ledger = TransactionService::new(&fx.storage, &accounts, &fx.clock);
        let account = fx.active_account(&accounts, "John Doe");
        let other = fx.active_account(&accounts, "Jane Roe");

        let t = fx.now();
        let middle = ledger.create(deposit(&account, 2, t)).unwrap();
        let oldest = ledger.create(deposit(&account, 1, t - Duration::minutes(5))).unwrap();
        let newest = ledger.create(deposit(&account, 3, t + Duration::minutes(5))).unwrap();
        ledger.create(deposit(&other, 99, t)).unwrap();

        assert_eq!(ledger.list(&account).unwrap(), vec![newest, middle, oldest]);
    }

    #[test]
    fn test_list_of_deleted_account_is_not_found() {
        let fx = Fixture::new();
        let accounts = fx.accounts();
        let ledger = TransactionService::new(&fx.storage, &accounts, &fx.clock);
        let account = fx.active_account(&accounts, "John Doe");
        ledger.create(deposit(&account, 1, fx.now())).unwrap();

        let deleted = accounts.deactivate(account.account_number).unwrap();
        assert!(ledger.list(&deleted).unwrap_err().is_not_found());
    }

    #[test]
    fn test_get_unknown_transaction() {
        let fx = Fixture::new();
        let accounts = fx.accounts();
        let ledger = TransactionService::new(&fx.storage, &accounts, &fx.clock);

        let err = ledger.get(TransactionId::new()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_update_keeps_id_and_account() {
        let fx = Fixture::new();
        let accounts = fx.accounts();
        let ledger = TransactionService::new(&fx.storage, &accounts, &fx.clock);
        let account = fx.active_account(&accounts, "John Doe");
        let txn = ledger.create(deposit(&account, 10, fx.now())).unwrap();

        let later = fx.now() + Duration::hours(1);
        let updated = ledger
            .update(
                txn.id,
                UpdateTransactionInput {
                    transaction_type: TransactionType::Withdrawal,
                    amount: 7,
                    timestamp: later,
                },
            )
            .unwrap();

        assert_eq!(updated.id, txn.id);
        assert_eq!(updated.account_number, account.account_number);
        assert_eq!(updated.transaction_type, TransactionType::Withdrawal);
        assert_eq!(updated.amount, 7);
        assert_eq!(updated.timestamp, later);

        let stored = ledger.get(txn.id).unwrap();
        assert_eq!(stored.amount, 7);
        assert_eq!(ledger.list(&account).unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_update_leaves_transaction_untouched() {
        let fx = Fixture::new();
        let accounts = fx.accounts();
        let ledger = TransactionService::new(&fx.storage, &accounts, &fx.clock);
        let account = fx.active_account(&accounts, "John Doe");
        let txn = ledger.create(deposit(&account, 10, fx.now())).unwrap();

        let err = ledger
            .update(
                txn.id,
                UpdateTransactionInput {
                    transaction_type: TransactionType::Withdrawal,
                    amount: 0,
                    timestamp: fx.now(),
                },
            )
            .unwrap_err();
        assert!(err.is_validation());

        let stored = ledger.get(txn.id).unwrap();
        assert_eq!(stored.transaction_type, TransactionType::Deposit);
        assert_eq!(stored.amount, 10);
    }

    #[test]
    fn test_update_unknown_transaction() {
        let fx = Fixture::new();
        let accounts = fx.accounts();
        let ledger = TransactionService::new(&fx.storage, &accounts, &fx.clock);

        let err = ledger
            .update(
                TransactionId::new(),
                UpdateTransactionInput {
                    transaction_type: TransactionType::Deposit,
                    amount: 1,
                    timestamp: fx.now(),
                },
            )
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_delete_future_transaction() {
        let fx = Fixture::new();
        let accounts = fx.accounts();
        let ledger = TransactionService::new(&fx.storage, &accounts, &fx.clock);
        let account = fx.active_account(&accounts, "John Doe");
        let txn = ledger
            .create(deposit(&account, 10, fx.now() + Duration::seconds(1)))
            .unwrap();

        let deleted = ledger.delete(txn.id).unwrap();
        assert_eq!(deleted.id, txn.id);
        assert!(ledger.get(txn.id).unwrap_err().is_not_found());
        assert!(ledger.delete(txn.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_delete_completed_transaction_is_refused() {
        let fx = Fixture::new();
        let accounts = fx.accounts();
        let ledger = TransactionService::new(&fx.storage, &accounts, &fx.clock);
        let account = fx.active_account(&accounts, "John Doe");

        let past = ledger
            .create(deposit(&account, 10, fx.now() - Duration::seconds(1)))
            .unwrap();
        let exactly_now = ledger.create(deposit(&account, 10, fx.now())).unwrap();

        for id in [past.id, exactly_now.id] {
            match ledger.delete(id) {
                Err(AccountingError::AlreadyCompleted(message)) => {
                    assert_eq!(message, "Completed transaction cannot be deleted")
                }
                other => panic!("expected AlreadyCompleted, got {:?}", other),
            }
            assert!(ledger.get(id).is_ok());
        }
    }

    #[test]
    fn test_transactions_survive_reload() {
        let fx = Fixture::new();
        let accounts = fx.accounts();
        let ledger = TransactionService::new(&fx.storage, &accounts, &fx.clock);
        let account = fx.active_account(&accounts, "John Doe");
        let txn = ledger.create(deposit(&account, 42, fx.now())).unwrap();

        fx.storage.transactions.load().unwrap();
        assert_eq!(ledger.get(txn.id).unwrap().amount, 42);
    }
}
