//! Transaction display formatting
//!
//! Register view of an account's transactions and a detail view of one
//! transaction.

use crate::models::{Transaction, TransactionType};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Format a single transaction for display (register row)
pub fn format_transaction_row(txn: &Transaction) -> String {
    let sign = match txn.transaction_type {
        TransactionType::Deposit => "+",
        TransactionType::Withdrawal => "-",
    };

    format!(
        "{:36}  {:23}  {:10}  {:>14}",
        txn.id.to_string(),
        txn.timestamp.format(TIMESTAMP_FORMAT).to_string(),
        txn.transaction_type.as_str(),
        format!("{}{}", sign, txn.amount),
    )
}

/// Format a list of transactions as a register
pub fn format_transaction_register(transactions: &[Transaction]) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:36}  {:23}  {:10}  {:>14}\n",
        "ID", "Timestamp", "Type", "Amount"
    ));
    output.push_str(&"-".repeat(91));
    output.push('\n');

    for txn in transactions {
        output.push_str(&format_transaction_row(txn));
        output.push('\n');
    }

    output
}

/// Format transaction details for display
pub fn format_transaction_details(txn: &Transaction) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Account:     {}\n", txn.account_number));
    output.push_str(&format!("Type:        {}\n", txn.transaction_type));
    output.push_str(&format!("Amount:      {}\n", txn.amount));
    output.push_str(&format!(
        "Timestamp:   {} ({})\n",
        txn.timestamp.format(TIMESTAMP_FORMAT),
        txn.timestamp.timestamp_millis()
    ));

    output
}
