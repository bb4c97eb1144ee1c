//! Service layer for the accounting service
//!
//! The service layer provides business logic on top of the storage layer:
//! the account lifecycle, the transaction ledger and balance computation.

pub mod account;
pub mod balance;
pub mod clock;
pub mod transaction;

pub use account::AccountService;
pub use balance::BalanceService;
pub use clock::{Clock, FixedClock, SystemClock};
pub use transaction::{CreateTransactionInput, TransactionService, UpdateTransactionInput};
