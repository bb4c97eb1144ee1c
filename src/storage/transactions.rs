//! Transaction repository for JSON storage
//!
//! Manages loading and saving transactions to transactions.json, with an
//! index from account number to transaction ids. Writes are locked
//! read-modify-writes of the file, like the account repository.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::AccountingError;
use crate::models::{AccountNumber, Transaction, TransactionId};

use super::file_io::{read_json, with_exclusive_lock, write_json_atomic};
use super::{read_lock, write_lock};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TransactionData {
    transactions: Vec<Transaction>,
}

type TransactionMap = HashMap<TransactionId, Transaction>;

/// Repository for transaction persistence with indexing
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<TransactionMap>,
    /// Index: account number -> transaction ids
    by_account: RwLock<HashMap<AccountNumber, Vec<TransactionId>>>,
}

impl TransactionRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_account: RwLock::new(HashMap::new()),
        }
    }

    /// Load transactions from disk and build the index
    pub fn load(&self) -> Result<(), AccountingError> {
        let transactions = self.read_file()?;
        self.replace_cache(transactions)
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> Result<Option<Transaction>, AccountingError> {
        let data = read_lock(&self.data)?;
        Ok(data.get(&id).cloned())
    }

    /// Transactions of an account, most recent first
    ///
    /// Equal timestamps are ordered by id so repeated queries agree.
    pub fn get_by_account(
        &self,
        account_number: AccountNumber,
    ) -> Result<Vec<Transaction>, AccountingError> {
        let data = read_lock(&self.data)?;
        let by_account = read_lock(&self.by_account)?;

        let ids = by_account
            .get(&account_number)
            .map(|v| v.as_slice())
            .unwrap_or(&[]);
        let mut transactions: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        sort_most_recent_first(&mut transactions);
        Ok(transactions)
    }

    /// Insert or replace a transaction
    pub fn upsert(&self, txn: Transaction) -> Result<(), AccountingError> {
        self.transact(|transactions| {
            transactions.insert(txn.id, txn);
            Ok(((), true))
        })
    }

    /// Change a stored transaction in place
    ///
    /// `f` sees the latest stored version. Returns `None` when the transaction
    /// does not exist; nothing is written when `f` fails.
    pub fn update<F>(&self, id: TransactionId, f: F) -> Result<Option<Transaction>, AccountingError>
    where
        F: FnOnce(&mut Transaction) -> Result<(), AccountingError>,
    {
        self.transact(|transactions| match transactions.get_mut(&id) {
            Some(txn) => {
                f(txn)?;
                Ok((Some(txn.clone()), true))
            }
            None => Ok((None, false)),
        })
    }

    /// Remove a transaction if `check` accepts its latest stored version
    ///
    /// Returns the removed transaction, or `None` when it does not exist.
    pub fn remove_if<F>(&self, id: TransactionId, check: F) -> Result<Option<Transaction>, AccountingError>
    where
        F: FnOnce(&Transaction) -> Result<(), AccountingError>,
    {
        self.transact(|transactions| {
            match transactions.get(&id) {
                Some(txn) => check(txn)?,
                None => return Ok((None, false)),
            }
            let removed = transactions.remove(&id);
            Ok((removed, true))
        })
    }

    pub fn count(&self) -> Result<usize, AccountingError> {
        let data = read_lock(&self.data)?;
        Ok(data.len())
    }

    /// Locked read-modify-write of the transactions file
    fn transact<T, F>(&self, f: F) -> Result<T, AccountingError>
    where
        F: FnOnce(&mut TransactionMap) -> Result<(T, bool), AccountingError>,
    {
        with_exclusive_lock(&self.path, || {
            let mut transactions = self.read_file()?;
            let (value, changed) = f(&mut transactions)?;
            if changed {
                self.write_file(&transactions)?;
            }
            self.replace_cache(transactions)?;
            Ok(value)
        })
    }

    fn read_file(&self) -> Result<TransactionMap, AccountingError> {
        let file_data: TransactionData = read_json(&self.path)?;
        Ok(file_data
            .transactions
            .into_iter()
            .map(|txn| (txn.id, txn))
            .collect())
    }

    fn write_file(&self, transactions: &TransactionMap) -> Result<(), AccountingError> {
        let mut transactions: Vec<_> = transactions.values().cloned().collect();
        sort_most_recent_first(&mut transactions);
        write_json_atomic(&self.path, &TransactionData { transactions })
    }

    fn replace_cache(&self, transactions: TransactionMap) -> Result<(), AccountingError> {
        let mut data = write_lock(&self.data)?;
        let mut by_account = write_lock(&self.by_account)?;

        by_account.clear();
        for txn in transactions.values() {
            by_account.entry(txn.account_number).or_default().push(txn.id);
        }
        *data = transactions;
        Ok(())
    }
}

fn sort_most_recent_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(a.id.cmp(&b.id)));
}
