//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod account;
pub mod transaction;

pub use account::{handle_account_command, AccountCommands};
pub use transaction::{handle_transaction_command, TransactionCommands};

use serde::Serialize;

use crate::config::AccountConfig;
use crate::error::AccountingResult;
use crate::security::SecurityCheckDispatcher;
use crate::services::{AccountService, Clock};
use crate::storage::Storage;

/// How command results are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Shared dependencies of the command handlers
pub struct CommandContext<'a> {
    pub storage: &'a Storage,
    pub account_config: &'a AccountConfig,
    pub security_checks: &'a SecurityCheckDispatcher,
    pub clock: &'a dyn Clock,
    pub output: OutputFormat,
}

impl<'a> CommandContext<'a> {
    pub fn accounts(&self) -> AccountService<'a> {
        AccountService::new(self.storage, self.account_config, self.security_checks)
    }

    /// Print `value` as JSON, or the text rendering otherwise
    fn emit<T: Serialize + ?Sized>(
        &self,
        value: &T,
        text: impl FnOnce() -> String,
    ) -> AccountingResult<()> {
        match self.output {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
            OutputFormat::Text => print!("{}", text()),
        }
        Ok(())
    }
}
