//! Terminal display formatting
//!
//! Turns ledger results into the text the shell prints.

pub mod account;

pub use account::{format_account_list, format_balance, format_statement};
