//! Account model
//!
//! A named account with its balance and the ordered history of
//! balance-affecting events. Accounts are owned by the ledger; everything
//! handed to callers is a clone.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::money::Money;

/// A named monetary account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique, case-sensitive account name
    pub name: String,

    /// Current balance, never negative
    pub balance: Money,

    /// Human-readable descriptions in chronological order
    #[serde(default)]
    pub transactions: Vec<String>,

    /// When the account was opened
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Open an account with a zero balance and no history
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            balance: Money::zero(),
            transactions: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Whether the balance can absorb a debit of `amount`
    pub fn can_cover(&self, amount: Money) -> bool {
        self.balance >= amount
    }

    /// Set the new balance and record the description that produced it
    pub(crate) fn post(&mut self, balance: Money, description: String) {
        self.balance = balance;
        self.transactions.push(description);
    }
}
