//! Account display formatting
//!
//! Formats accounts for terminal output in table and detail views.

use crate::models::{Account, Balance};

/// Format a list of accounts as a table
pub fn format_account_list(accounts: &[Account]) -> String {
    if accounts.is_empty() {
        return "No accounts found.".to_string();
    }

    let holder_width = accounts
        .iter()
        .map(|a| a.account_holder_name.chars().count())
        .max()
        .unwrap_or(6)
        .max(6);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<16}  {:<holder_width$}  {:<16}  {}\n",
        "Number",
        "Holder",
        "Bank",
        "Created",
        holder_width = holder_width,
    ));
    output.push_str(&format!(
        "{:-<16}  {:-<holder_width$}  {:-<16}  {:-<20}\n",
        "",
        "",
        "",
        "",
        holder_width = holder_width,
    ));

    for account in accounts {
        output.push_str(&format!(
            "{:<16}  {:<holder_width$}  {:<16}  {}\n",
            account.account_number.to_string(),
            account.account_holder_name,
            account.bank_id.to_string(),
            account.created_at.format("%Y-%m-%d %H:%M UTC"),
            holder_width = holder_width,
        ));
    }

    output
}

/// Format a single account's details
pub fn format_account_details(account: &Account) -> String {
    let mut output = String::new();

    output.push_str(&format!("Account: {}\n", account.account_number));
    output.push_str(&format!("  Holder:   {}\n", account.account_holder_name));
    output.push_str(&format!("  Bank ID:  {}\n", account.bank_id));
    output.push_str(&format!("  State:    {}\n", account.state()));
    output.push('\n');
    output.push_str(&format!(
        "  Created:  {}\n",
        account.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    output.push_str(&format!(
        "  Modified: {}\n",
        account.updated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    output
}

pub fn format_balance(account: &Account, balance: &Balance) -> String {
    format!("Balance of {}: {}\n", account.account_number, balance)
}
