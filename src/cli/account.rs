//! Account CLI commands
//!
//! Implements CLI commands for the account lifecycle, plus the per-account
//! views of balance and transactions.

use clap::{ArgAction, Subcommand};

use super::CommandContext;
use crate::display::account::{format_account_details, format_account_list, format_balance};
use crate::display::transaction::format_transaction_register;
use crate::error::AccountingResult;
use crate::models::{AccountNumber, TransactionResponse};
use crate::services::{BalanceService, TransactionService};

/// Account subcommands
#[derive(Subcommand)]
pub enum AccountCommands {
    /// Prepare a new account and request the holder's security check
    Prepare {
        /// Name of the account holder
        holder_name: String,
    },
    /// Record the security check verdict for a prepared account
    Create {
        /// 16-digit account number
        account_number: AccountNumber,
        /// Whether the security check passed
        #[arg(long, action = ArgAction::Set, required = true)]
        passed: bool,
    },
    /// List active accounts
    List,
    /// Show account details
    Show {
        /// 16-digit account number
        account_number: AccountNumber,
    },
    /// Delete (deactivate) an account
    Delete {
        /// 16-digit account number
        account_number: AccountNumber,
    },
    /// Show the current balance of an account
    Balance {
        /// 16-digit account number
        account_number: AccountNumber,
    },
    /// List the transactions of an account, most recent first
    Transactions {
        /// 16-digit account number
        account_number: AccountNumber,
    },
}

/// Handle an account command
pub fn handle_account_command(ctx: &CommandContext<'_>, cmd: AccountCommands) -> AccountingResult<()> {
    let service = ctx.accounts();

    match cmd {
        AccountCommands::Prepare { holder_name } => {
            let account = service.prepare(&holder_name)?;
            service.request_security_check(&account);

            ctx.emit(&account, || {
                format!(
                    "Prepared account: {}\n  Holder: {}\n  Security check requested; the account \
                     becomes usable once it passes.\n",
                    account.account_number, account.account_holder_name
                )
            })?;
        }

        AccountCommands::Create {
            account_number,
            passed,
        } => {
            let account = service.activate(account_number, passed)?;
            ctx.emit(&account, || format!("Created account: {}\n", account.account_number))?;
        }

        AccountCommands::List => {
            let accounts = service.list()?;
            ctx.emit(&accounts, || format_account_list(&accounts))?;
        }

        AccountCommands::Show { account_number } => {
            let account = service.get(account_number)?;
            ctx.emit(&account, || format_account_details(&account))?;
        }

        AccountCommands::Delete { account_number } => {
            let account = service.deactivate(account_number)?;
            ctx.emit(&account, || format!("Deleted account: {}\n", account.account_number))?;
        }

        AccountCommands::Balance { account_number } => {
            let account = service.get(account_number)?;
            let ledger = TransactionService::new(ctx.storage, &service, ctx.clock);
            let balance = BalanceService::new(&ledger, ctx.clock).compute_balance(&account)?;
            ctx.emit(&balance, || format_balance(&account, &balance))?;
        }

        AccountCommands::Transactions { account_number } => {
            let account = service.get(account_number)?;
            let ledger = TransactionService::new(ctx.storage, &service, ctx.clock);
            let transactions = ledger.list(&account)?;

            let responses: Vec<TransactionResponse> =
                transactions.iter().map(|t| t.to_response()).collect();
            ctx.emit(&responses, || format_transaction_register(&transactions))?;
        }
    }

    Ok(())
}
