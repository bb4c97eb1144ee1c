//! Account model
//!
//! An account is persisted with two flags, `created` and `deleted`. Code paths
//! that make decisions read the derived [`AccountState`] instead, and the flags
//! only change through [`Account::activate`] and [`Account::deactivate`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountNumber, BankId};

/// Lifecycle state of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountState {
    /// Waiting for the security check, not usable yet
    Prepared,
    /// Security check passed, account is usable
    Active,
    /// Soft-deleted, terminal
    Deleted,
}

impl fmt::Display for AccountState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prepared => write!(f, "Prepared"),
            Self::Active => write!(f, "Active"),
            Self::Deleted => write!(f, "Deleted"),
        }
    }
}

/// A bank account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Id of the issuing bank
    pub bank_id: BankId,

    /// Account number, never changes once generated
    pub account_number: AccountNumber,

    /// Name of the account holder
    pub account_holder_name: String,

    #[serde(default)]
    created: bool,

    #[serde(default)]
    deleted: bool,

    /// When the account was prepared
    pub created_at: DateTime<Utc>,

    /// When the account was last modified
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a prepared account
    pub fn new(
        bank_id: BankId,
        account_number: AccountNumber,
        account_holder_name: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            bank_id,
            account_number,
            account_holder_name: account_holder_name.into(),
            created: false,
            deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn state(&self) -> AccountState {
        match (self.created, self.deleted) {
            (_, true) => AccountState::Deleted,
            (true, false) => AccountState::Active,
            (false, false) => AccountState::Prepared,
        }
    }

    pub fn is_created(&self) -> bool {
        self.created
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn is_active(&self) -> bool {
        self.state() == AccountState::Active
    }

    /// Mark the account as created after a passed security check
    ///
    /// Allowed from `Prepared` and, as a no-op, from `Active`.
    pub fn activate(&mut self) -> Result<(), AccountStateError> {
        match self.state() {
            AccountState::Deleted => Err(AccountStateError::Deleted),
            AccountState::Prepared | AccountState::Active => {
                self.created = true;
                self.updated_at = Utc::now();
                Ok(())
            }
        }
    }

    /// Soft-delete an active account
    pub fn deactivate(&mut self) -> Result<(), AccountStateError> {
        match self.state() {
            AccountState::Active => {
                self.deleted = true;
                self.updated_at = Utc::now();
                Ok(())
            }
            AccountState::Prepared => Err(AccountStateError::NotActive),
            AccountState::Deleted => Err(AccountStateError::Deleted),
        }
    }

    /// Validate the account
    pub fn validate(&self) -> Result<(), AccountValidationError> {
        if self.account_holder_name.trim().is_empty() {
            return Err(AccountValidationError::BlankHolderName);
        }

        if self.bank_id.validate().is_err() {
            return Err(AccountValidationError::InvalidBankId(self.bank_id.value()));
        }

        Ok(())
    }
}

impl PartialEq for Account {
    fn eq(&self, other: &Self) -> bool {
        self.account_number == other.account_number
    }
}

impl Eq for Account {}

impl std::hash::Hash for Account {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.account_number.hash(state);
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Account[bankId:{},number:{},holder:{},created:{},deleted:{}]",
            self.bank_id, self.account_number, self.account_holder_name, self.created, self.deleted
        )
    }
}

/// Validation errors for accounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    BlankHolderName,
    InvalidBankId(u64),
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BlankHolderName => write!(f, "accountHolderName must not be blank"),
            Self::InvalidBankId(id) => write!(f, "bankId {} must have 16 digits", id),
        }
    }
}

impl std::error::Error for AccountValidationError {}

/// Rejected lifecycle transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountStateError {
    NotActive,
    Deleted,
}

impl fmt::Display for AccountStateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotActive => write!(f, "Account is not active"),
            Self::Deleted => write!(f, "Account is deleted"),
        }
    }
}

impl std::error::Error for AccountStateError {}
