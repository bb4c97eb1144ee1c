//! Account service
//!
//! Owns the account lifecycle: prepare, request the security check, activate
//! on a passed check, look up, list and deactivate.

use rand::rngs::OsRng;
use tracing::{debug, info};

use crate::config::AccountConfig;
use crate::error::{AccountingError, AccountingResult};
use crate::models::{Account, AccountNumber};
use crate::security::{SecurityCheckDispatcher, ValidationRequest};
use crate::storage::Storage;

/// Service for the account lifecycle
pub struct AccountService<'a> {
    storage: &'a Storage,
    config: &'a AccountConfig,
    security_checks: &'a SecurityCheckDispatcher,
}

impl<'a> AccountService<'a> {
    pub fn new(
        storage: &'a Storage,
        config: &'a AccountConfig,
        security_checks: &'a SecurityCheckDispatcher,
    ) -> Self {
        Self {
            storage,
            config,
            security_checks,
        }
    }

    /// Create a prepared account for `account_holder_name`
    ///
    /// Nothing is stored when the name is blank. A generated number that is
    /// already taken is replaced by a fresh one.
    pub fn prepare(&self, account_holder_name: &str) -> AccountingResult<Account> {
        loop {
            let account = Account::new(
                self.config.bank_id,
                AccountNumber::generate(&mut OsRng),
                account_holder_name,
            );

            account
                .validate()
                .map_err(|e| AccountingError::validation(e.to_string()))?;

            if self.storage.accounts.insert(account.clone())? {
                debug!(%account, "account saved");
                return Ok(account);
            }
            debug!(
                candidate = %account.account_number,
                "generated account number already taken, drawing again"
            );
        }
    }

    /// Ask the security validator to check the holder of `account`
    ///
    /// Returns immediately; the outcome comes back through [`Self::activate`].
    pub fn request_security_check(&self, account: &Account) {
        self.security_checks.submit(ValidationRequest {
            account_number: account.account_number,
            account_holder_name: account.account_holder_name.clone(),
            callback_url: self.config.callback_url.clone(),
        });
    }

    /// Record the security check verdict for a prepared (or active) account
    pub fn activate(
        &self,
        account_number: AccountNumber,
        security_check_passed: bool,
    ) -> AccountingResult<Account> {
        let account = self
            .storage
            .accounts
            .update(account_number, |account| {
                if account.is_deleted() {
                    return Err(AccountingError::account_not_found(account_number));
                }

                if !security_check_passed {
                    info!(%account_number, "security check failed, account stays prepared");
                    return Err(AccountingError::InsecureHolder {
                        account_holder_name: account.account_holder_name.clone(),
                    });
                }

                account
                    .activate()
                    .map_err(|_| AccountingError::account_not_found(account_number))
            })?
            .ok_or_else(|| AccountingError::account_not_found(account_number))?;

        info!(%account_number, "account activated");
        debug!(%account, "account saved");
        Ok(account)
    }

    /// Get an active account
    ///
    /// Prepared and deleted accounts are reported as not found.
    pub fn get(&self, account_number: AccountNumber) -> AccountingResult<Account> {
        self.storage
            .accounts
            .get_active_by_number(account_number)?
            .ok_or_else(|| AccountingError::account_not_found(account_number))
    }

    /// All active accounts
    pub fn list(&self) -> AccountingResult<Vec<Account>> {
        self.storage.accounts.get_active()
    }

    /// Soft-delete an active account
    pub fn deactivate(&self, account_number: AccountNumber) -> AccountingResult<Account> {
        let account = self
            .storage
            .accounts
            .update(account_number, |account| {
                if !account.is_active() {
                    return Err(AccountingError::account_not_found(account_number));
                }

                account
                    .deactivate()
                    .map_err(|_| AccountingError::account_not_found(account_number))
            })?
            .ok_or_else(|| AccountingError::account_not_found(account_number))?;

        info!(%account_number, "account deactivated");
        debug!(%account, "account saved");
        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AccountState;
    use crate::services::testing::Fixture;

    #[test]
    fn test_prepare_account() {
        let fx = Fixture::new();
        let service = fx.accounts();

        let account = service.prepare("John Doe").unwrap();

        assert_eq!(account.account_holder_name, "John Doe");
        assert_eq!(account.bank_id, fx.config.bank_id);
        assert_eq!(account.state(), AccountState::Prepared);
        assert_eq!(account.account_number.to_string().len(), 16);

        let stored = fx.storage.accounts.get(account.account_number).unwrap();
        assert_eq!(stored.unwrap().state(), AccountState::Prepared);
    }

    #[test]
    fn test_prepare_rejects_blank_names_without_storing() {
        let fx = Fixture::new();
        let service = fx.accounts();

        for name in ["", " ", "\t\n"] {
            let result = service.prepare(name);
            assert!(matches!(result, Err(AccountingError::Validation(_))));
        }

        assert_eq!(fx.storage.accounts.count().unwrap(), 0);
    }

    #[test]
    fn test_prepared_account_is_not_visible() {
        let fx = Fixture::new();
        let service = fx.accounts();

        let account = service.prepare("John Doe").unwrap();

        assert!(service.get(account.account_number).unwrap_err().is_not_found());
        assert!(service.list().unwrap().is_empty());
    }

    #[test]
    fn test_activate_with_passed_check() {
        let fx = Fixture::new();
        let service = fx.accounts();

        let prepared = service.prepare("John Doe").unwrap();
        let activated = service.activate(prepared.account_number, true).unwrap();

        assert_eq!(activated.account_number, prepared.account_number);
        assert_eq!(activated.state(), AccountState::Active);

        let fetched = service.get(prepared.account_number).unwrap();
        assert_eq!(fetched, prepared);
        assert_eq!(service.list().unwrap(), vec![prepared]);
    }

    #[test]
    fn test_activate_with_failed_check() {
        let fx = Fixture::new();
        let service = fx.accounts();

        let prepared = service.prepare("Mallory").unwrap();
        let result = service.activate(prepared.account_number, false);

        match result {
            Err(AccountingError::InsecureHolder {
                account_holder_name,
            }) => assert_eq!(account_holder_name, "Mallory"),
            other => panic!("expected InsecureHolder, got {:?}", other),
        }

        let stored = fx.storage.accounts.get(prepared.account_number).unwrap().unwrap();
        assert!(!stored.is_created());
        assert!(service.get(prepared.account_number).unwrap_err().is_not_found());
    }

    #[test]
    fn test_activate_twice_is_harmless() {
        let fx = Fixture::new();
        let service = fx.accounts();

        let prepared = service.prepare("John Doe").unwrap();
        service.activate(prepared.account_number, true).unwrap();
        let again = service.activate(prepared.account_number, true).unwrap();

        assert_eq!(again.state(), AccountState::Active);
        assert_eq!(service.list().unwrap().len(), 1);
    }

    #[test]
    fn test_activate_unknown_account() {
        let fx = Fixture::new();
        let service = fx.accounts();

        let unknown = AccountNumber::new(1234567812345678).unwrap();
        assert!(service.activate(unknown, true).unwrap_err().is_not_found());
        assert!(service.activate(unknown, false).unwrap_err().is_not_found());
    }

    #[test]
    fn test_deactivate() {
        let fx = Fixture::new();
        let service = fx.accounts();

        let account = fx.active_account(&service, "John Doe");
        let number = account.account_number;

        let deleted = service.deactivate(number).unwrap();
        assert_eq!(deleted.account_number, number);
        assert_eq!(deleted.state(), AccountState::Deleted);
        assert!(deleted.is_created());

        assert!(service.get(number).unwrap_err().is_not_found());
        assert!(service.list().unwrap().is_empty());
        assert!(service.deactivate(number).unwrap_err().is_not_found());
        assert!(service.activate(number, true).unwrap_err().is_not_found());
    }

    #[test]
    fn test_deactivate_prepared_account_is_not_found() {
        let fx = Fixture::new();
        let service = fx.accounts();

        let prepared = service.prepare("John Doe").unwrap();
        assert!(service.deactivate(prepared.account_number).unwrap_err().is_not_found());
    }

    #[test]
    fn test_processes_sharing_data_see_each_others_changes() {
        let fx = Fixture::new();
        let service = fx.accounts();
        let account = fx.active_account(&service, "John Doe");

        let other_storage = fx.open_storage();
        let other = AccountService::new(&other_storage, &fx.config, &fx.dispatcher);

        let jane = other.prepare("Jane Roe").unwrap();
        service.deactivate(account.account_number).unwrap();

        // `other` still has the account cached as active
        assert!(other.activate(account.account_number, true).unwrap_err().is_not_found());
        other.activate(jane.account_number, true).unwrap();

        let fresh = fx.open_storage();
        let deleted = fresh.accounts.get(account.account_number).unwrap().unwrap();
        assert_eq!(deleted.state(), AccountState::Deleted);
        let activated = fresh.accounts.get(jane.account_number).unwrap().unwrap();
        assert_eq!(activated.state(), AccountState::Active);
    }

    #[test]
    fn test_account_numbers_are_unique() {
        let fx = Fixture::new();
        let service = fx.accounts();

        let mut numbers: Vec<_> = (0..50)
            .map(|i| service.prepare(&format!("Holder {}", i)).unwrap().account_number)
            .collect();
        numbers.sort();
        numbers.dedup();
        assert_eq!(numbers.len(), 50);
    }

    #[test]
    fn test_request_security_check_reaches_validator() {
        let mut fx = Fixture::new();
        let account = {
            let service = fx.accounts();
            let account = service.prepare("John Doe").unwrap();
            service.request_security_check(&account);
            account
        };

        fx.dispatcher.shutdown();

        let seen = fx.validator.requests();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].account_number, account.account_number);
        assert_eq!(seen[0].account_holder_name, "John Doe");
        assert_eq!(seen[0].callback_url, fx.config.callback_url);
    }
}
