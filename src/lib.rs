//! accounting - bank account lifecycle and transaction ledger
//!
//! Accounts go through a two-phase activation: they are prepared, an
//! external security validator checks the holder in the background, and the
//! validator's verdict activates the account (or leaves it unusable).
//! Active accounts carry a ledger of deposits and withdrawals; the balance
//! is derived from the ledger on demand and only counts transactions that
//! have already taken place.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (accounts, transactions, balance)
//! - `storage`: JSON file storage layer
//! - `security`: Security validator client and background dispatch
//! - `services`: Business logic layer
//! - `display`: Terminal formatting
//! - `cli`: Command handlers
//! - `logging`: Tracing setup
//!
//! # Example
//!
//! ```rust,ignore
//! use accounting::config::{paths::AccountingPaths, settings::Settings};
//!
//! let paths = AccountingPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod security;
pub mod services;
pub mod storage;

pub use error::{AccountingError, AccountingResult};
