//! Display formatting for terminal output
//!
//! Plain-text tables and detail views for accounts, transactions and
//! balances.

pub mod account;
pub mod transaction;

pub use account::{format_account_details, format_account_list, format_balance};
pub use transaction::{format_transaction_details, format_transaction_register};
