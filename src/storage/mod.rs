//! Storage layer
//!
//! JSON file storage with atomic writes and in-memory indexes. Each write
//! locks the entity file, merges the one changed entity into its latest
//! contents and replaces the file atomically.

pub mod accounts;
pub mod file_io;
pub mod transactions;

pub use accounts::AccountRepository;
pub use file_io::{read_json, with_exclusive_lock, write_json_atomic};
pub use transactions::TransactionRepository;

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::paths::AccountingPaths;
use crate::error::AccountingError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: AccountingPaths,
    pub accounts: AccountRepository,
    pub transactions: TransactionRepository,
}

impl Storage {
    pub fn new(paths: AccountingPaths) -> Result<Self, AccountingError> {
        paths.ensure_directories()?;

        Ok(Self {
            accounts: AccountRepository::new(paths.accounts_file()),
            transactions: TransactionRepository::new(paths.transactions_file()),
            paths,
        })
    }

    pub fn paths(&self) -> &AccountingPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), AccountingError> {
        self.accounts.load()?;
        self.transactions.load()?;
        Ok(())
    }
}

pub(crate) fn read_lock<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, AccountingError> {
    lock.read()
        .map_err(|e| AccountingError::Storage(format!("Failed to acquire read lock: {}", e)))
}

pub(crate) fn write_lock<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, AccountingError> {
    lock.write()
        .map_err(|e| AccountingError::Storage(format!("Failed to acquire write lock: {}", e)))
}
