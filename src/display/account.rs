//! Account display formatting
//!
//! Formats balances, statements and the account table for terminal output.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{Account, Money};
use crate::services::Statement;

#[derive(Tabled)]
struct AccountRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Balance")]
    balance: String,
    #[tabled(rename = "Entries")]
    entries: usize,
    #[tabled(rename = "Opened")]
    opened: String,
}

/// Format the answer to a balance inquiry
pub fn format_balance(balance: Money, symbol: &str) -> String {
    format!("Current balance: {}.", balance.format_with_symbol(symbol))
}

/// Format an account statement, one entry per line
pub fn format_statement(statement: &Statement) -> String {
    if statement.is_empty() {
        return "No transactions available.".to_string();
    }

    let mut output = format!("Account statement for {}:\n", statement.account);
    for entry in statement.iter() {
        output.push_str("- ");
        output.push_str(entry);
        output.push('\n');
    }
    output
}

/// Format all accounts as a table with a total line
pub fn format_account_list(accounts: &[Account], symbol: &str) -> String {
    if accounts.is_empty() {
        return "No accounts found.".to_string();
    }

    let rows = accounts.iter().map(|account| AccountRow {
        name: account.name.clone(),
        balance: account.balance.format_with_symbol(symbol),
        entries: account.transactions.len(),
        opened: account.created_at.format("%Y-%m-%d %H:%M").to_string(),
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());

    // each balance fits in i64 cents, their sum may not
    let total = accounts
        .iter()
        .try_fold(Money::zero(), |acc, a| acc.checked_add(a.balance))
        .map(|total| total.format_with_symbol(symbol))
        .unwrap_or_else(|| "too large to display".to_string());
    format!(
        "{}\nTotal: {} across {} account{}",
        table,
        total,
        accounts.len(),
        if accounts.len() == 1 { "" } else { "s" }
    )
}
