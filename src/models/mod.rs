//! Core data models
//!
//! Accounts, transactions, their identifiers and the derived balance.

pub mod account;
pub mod balance;
pub mod ids;
pub mod transaction;

pub use account::{Account, AccountState, AccountStateError, AccountValidationError};
pub use balance::Balance;
pub use ids::{AccountNumber, BankId, TransactionId};
pub use transaction::{
    parse_timestamp, Transaction, TransactionResponse, TransactionType,
    TransactionValidationError,
};
