//! Account repository for JSON storage
//!
//! Manages loading and saving accounts to accounts.json. Reads are served from
//! an in-memory copy; every write is a locked read-modify-write of the file,
//! so processes sharing the data directory never overwrite each other.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::AccountingError;
use crate::models::{Account, AccountNumber};

use super::file_io::{read_json, with_exclusive_lock, write_json_atomic};
use super::{read_lock, write_lock};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct AccountData {
    accounts: Vec<Account>,
}

type AccountMap = HashMap<AccountNumber, Account>;

/// Repository for account persistence
pub struct AccountRepository {
    path: PathBuf,
    data: RwLock<AccountMap>,
}

impl AccountRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load accounts from disk
    pub fn load(&self) -> Result<(), AccountingError> {
        let accounts = self.read_file()?;
        self.replace_cache(accounts)
    }

    /// Get an account by number, whatever its state
    pub fn get(&self, number: AccountNumber) -> Result<Option<Account>, AccountingError> {
        let data = read_lock(&self.data)?;
        Ok(data.get(&number).cloned())
    }

    /// Get an account only if it is active
    pub fn get_active_by_number(
        &self,
        number: AccountNumber,
    ) -> Result<Option<Account>, AccountingError> {
        Ok(self.get(number)?.filter(Account::is_active))
    }

    /// All active accounts in creation order
    pub fn get_active(&self) -> Result<Vec<Account>, AccountingError> {
        let data = read_lock(&self.data)?;

        let mut accounts: Vec<_> = data.values().filter(|a| a.is_active()).cloned().collect();
        sort_by_creation(&mut accounts);
        Ok(accounts)
    }

    /// Store a new account unless its number is already taken
    ///
    /// Returns `false` (and stores nothing) when the number is in use.
    pub fn insert(&self, account: Account) -> Result<bool, AccountingError> {
        self.transact(|accounts| {
            if accounts.contains_key(&account.account_number) {
                return Ok((false, false));
            }
            accounts.insert(account.account_number, account);
            Ok((true, true))
        })
    }

    /// Change a stored account in place
    ///
    /// `f` sees the latest stored version. Returns `None` when the account
    /// does not exist; nothing is written when `f` fails.
    pub fn update<F>(&self, number: AccountNumber, f: F) -> Result<Option<Account>, AccountingError>
    where
        F: FnOnce(&mut Account) -> Result<(), AccountingError>,
    {
        self.transact(|accounts| match accounts.get_mut(&number) {
            Some(account) => {
                f(account)?;
                Ok((Some(account.clone()), true))
            }
            None => Ok((None, false)),
        })
    }

    pub fn count(&self) -> Result<usize, AccountingError> {
        let data = read_lock(&self.data)?;
        Ok(data.len())
    }

    /// Locked read-modify-write of the accounts file
    ///
    /// `f` returns its value and whether the map changed. On success the
    /// in-memory copy is replaced by what is on disk.
    fn transact<T, F>(&self, f: F) -> Result<T, AccountingError>
    where
        F: FnOnce(&mut AccountMap) -> Result<(T, bool), AccountingError>,
    {
        with_exclusive_lock(&self.path, || {
            let mut accounts = self.read_file()?;
            let (value, changed) = f(&mut accounts)?;
            if changed {
                self.write_file(&accounts)?;
            }
            self.replace_cache(accounts)?;
            Ok(value)
        })
    }

    fn read_file(&self) -> Result<AccountMap, AccountingError> {
        let file_data: AccountData = read_json(&self.path)?;
        Ok(file_data
            .accounts
            .into_iter()
            .map(|account| (account.account_number, account))
            .collect())
    }

    fn write_file(&self, accounts: &AccountMap) -> Result<(), AccountingError> {
        let mut accounts: Vec<_> = accounts.values().cloned().collect();
        sort_by_creation(&mut accounts);
        write_json_atomic(&self.path, &AccountData { accounts })
    }

    fn replace_cache(&self, accounts: AccountMap) -> Result<(), AccountingError> {
        *write_lock(&self.data)? = accounts;
        Ok(())
    }
}

fn sort_by_creation(accounts: &mut [Account]) {
    accounts.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then(a.account_number.cmp(&b.account_number))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BankId;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, AccountRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = AccountRepository::new(temp_dir.path().join("accounts.json"));
        (temp_dir, repo)
    }

    fn account(number: u64) -> Account {
        Account::new(
            BankId::default(),
            AccountNumber::new(number).unwrap(),
            "John Doe",
        )
    }

    fn active(number: u64) -> Account {
        let mut account = account(number);
        account.activate().unwrap();
        account
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let account = active(1234567812345678);
        let number = account.account_number;
        assert!(repo.insert(account).unwrap());

        let repo2 = AccountRepository::new(temp_dir.path().join("accounts.json"));
        repo2.load().unwrap();

        let retrieved = repo2.get(number).unwrap().unwrap();
        assert_eq!(retrieved.account_holder_name, "John Doe");
        assert!(retrieved.is_active());
    }

    #[test]
    fn test_state_predicates() {
        let (_temp_dir, repo) = create_test_repo();

        let prepared = account(1000000000000001);
        let active_account = active(1000000000000002);
        let mut deleted = active(1000000000000003);
        deleted.deactivate().unwrap();

        repo.insert(prepared.clone()).unwrap();
        repo.insert(active_account.clone()).unwrap();
        repo.insert(deleted.clone()).unwrap();

        let listed = repo.get_active().unwrap();
        assert_eq!(listed, vec![active_account.clone()]);

        assert!(repo.get_active_by_number(prepared.account_number).unwrap().is_none());
        assert!(repo.get_active_by_number(active_account.account_number).unwrap().is_some());
        assert!(repo.get_active_by_number(deleted.account_number).unwrap().is_none());

        assert!(repo.get(deleted.account_number).unwrap().is_some());
    }

    #[test]
    fn test_active_accounts_in_creation_order() {
        let (_temp_dir, repo) = create_test_repo();

        let first = active(9000000000000000);
        let mut second = active(1000000000000000);
        second.created_at = first.created_at + chrono::Duration::seconds(1);

        repo.insert(second.clone()).unwrap();
        repo.insert(first.clone()).unwrap();

        let listed = repo.get_active().unwrap();
        assert_eq!(listed, vec![first, second]);
    }

    #[test]
    fn test_writers_sharing_a_file_keep_each_others_accounts() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("accounts.json");
        let first = AccountRepository::new(path.clone());
        let second = AccountRepository::new(path.clone());
        first.load().unwrap();
        second.load().unwrap();

        first.insert(account(1000000000000001)).unwrap();
        second.insert(account(1000000000000002)).unwrap();

        let fresh = AccountRepository::new(path);
        fresh.load().unwrap();
        assert!(fresh.get(AccountNumber::new(1000000000000001).unwrap()).unwrap().is_some());
        assert!(fresh.get(AccountNumber::new(1000000000000002).unwrap()).unwrap().is_some());

        // The second writer also picked up the first one's account
        assert_eq!(second.count().unwrap(), 2);
    }

    #[test]
    fn test_insert_refuses_taken_number() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("accounts.json");
        let first = AccountRepository::new(path.clone());
        let second = AccountRepository::new(path);
        first.load().unwrap();
        second.load().unwrap();

        assert!(first.insert(account(1000000000000001)).unwrap());

        let mut other_holder = account(1000000000000001);
        other_holder.account_holder_name = "Jane Roe".into();
        assert!(!second.insert(other_holder).unwrap());

        let stored = second.get(AccountNumber::new(1000000000000001).unwrap()).unwrap();
        assert_eq!(stored.unwrap().account_holder_name, "John Doe");
    }

    #[test]
    fn test_update_sees_latest_version_and_skips_failed_changes() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("accounts.json");
        let first = AccountRepository::new(path.clone());
        let second = AccountRepository::new(path);
        first.load().unwrap();
        second.load().unwrap();

        let number = AccountNumber::new(1000000000000001).unwrap();
        first.insert(account(1000000000000001)).unwrap();

        // Unknown to `second`'s cache, but present on disk
        let activated = second
            .update(number, |a| a.activate().map_err(|e| AccountingError::validation(e.to_string())))
            .unwrap()
            .unwrap();
        assert!(activated.is_active());

        let failed = first.update(number, |_| Err(AccountingError::validation("no")));
        assert!(failed.unwrap_err().is_validation());

        first.load().unwrap();
        assert!(first.get(number).unwrap().unwrap().is_active());

        let missing = first
            .update(AccountNumber::new(1000000000000009).unwrap(), |_| Ok(()))
            .unwrap();
        assert!(missing.is_none());
    }
}
