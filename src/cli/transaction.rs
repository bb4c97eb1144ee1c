//! Transaction CLI commands
//!
//! Implements CLI commands for recording and maintaining transactions.

use chrono::{DateTime, Utc};
use clap::Subcommand;

use super::CommandContext;
use crate::display::transaction::format_transaction_details;
use crate::error::{AccountingError, AccountingResult};
use crate::models::{
    parse_timestamp, AccountNumber, TransactionId, TransactionType, TransactionValidationError,
};
use crate::services::{CreateTransactionInput, TransactionService, UpdateTransactionInput};

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record a transaction on an active account
    Create {
        /// 16-digit account number
        account_number: AccountNumber,
        /// DEPOSIT or WITHDRAWAL
        transaction_type: String,
        /// Amount in integer units, must be positive
        #[arg(allow_hyphen_values = true)]
        amount: i64,
        /// Epoch milliseconds or RFC 3339 date-time
        timestamp: String,
    },
    /// Show a transaction
    Show {
        /// Transaction ID
        id: TransactionId,
    },
    /// Replace type, amount and timestamp of a transaction
    Update {
        /// Transaction ID
        id: TransactionId,
        /// DEPOSIT or WITHDRAWAL
        transaction_type: String,
        /// Amount in integer units, must be positive
        #[arg(allow_hyphen_values = true)]
        amount: i64,
        /// Epoch milliseconds or RFC 3339 date-time
        timestamp: String,
    },
    /// Delete a transaction that has not taken place yet
    Delete {
        /// Transaction ID
        id: TransactionId,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(
    ctx: &CommandContext<'_>,
    cmd: TransactionCommands,
) -> AccountingResult<()> {
    let accounts = ctx.accounts();
    let service = TransactionService::new(ctx.storage, &accounts, ctx.clock);

    match cmd {
        TransactionCommands::Create {
            account_number,
            transaction_type,
            amount,
            timestamp,
        } => {
            let (transaction_type, amount, timestamp) =
                parse_fields(&transaction_type, amount, &timestamp)?;

            let txn = service.create(CreateTransactionInput {
                account_number,
                transaction_type,
                amount,
                timestamp,
            })?;

            ctx.emit(&txn.to_response(), || {
                format!("Created transaction: {}\n", txn.id) + &format_transaction_details(&txn)
            })?;
        }

        TransactionCommands::Show { id } => {
            let txn = service.get(id)?;
            ctx.emit(&txn.to_response(), || format_transaction_details(&txn))?;
        }

        TransactionCommands::Update {
            id,
            transaction_type,
            amount,
            timestamp,
        } => {
            let (transaction_type, amount, timestamp) =
                parse_fields(&transaction_type, amount, &timestamp)?;

            let txn = service.update(
                id,
                UpdateTransactionInput {
                    transaction_type,
                    amount,
                    timestamp,
                },
            )?;

            ctx.emit(&txn.to_response(), || {
                format!("Updated transaction: {}\n", txn.id) + &format_transaction_details(&txn)
            })?;
        }

        TransactionCommands::Delete { id } => {
            let txn = service.delete(id)?;
            ctx.emit(&txn.to_response(), || format!("Deleted transaction: {}\n", txn.id))?;
        }
    }

    Ok(())
}

/// Check the request fields together, reporting every problem at once
fn parse_fields(
    transaction_type: &str,
    amount: i64,
    timestamp: &str,
) -> AccountingResult<(TransactionType, i64, DateTime<Utc>)> {
    let mut messages = Vec::new();

    let transaction_type = transaction_type
        .parse::<TransactionType>()
        .map_err(|e| messages.extend(validation_messages(e)))
        .ok();

    if amount <= 0 {
        messages.push(TransactionValidationError::NonPositiveAmount(amount).to_string());
    }

    let timestamp = parse_timestamp(timestamp)
        .map_err(|e| messages.extend(validation_messages(e)))
        .ok();

    match (transaction_type, timestamp) {
        (Some(transaction_type), Some(timestamp)) if messages.is_empty() => {
            Ok((transaction_type, amount, timestamp))
        }
        _ => Err(AccountingError::Validation(messages)),
    }
}

fn validation_messages(err: AccountingError) -> Vec<String> {
    match err {
        AccountingError::Validation(messages) => messages,
        other => vec![other.to_string()],
    }
}
