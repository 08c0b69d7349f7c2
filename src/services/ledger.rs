//! Ledger service
//!
//! Owns the in-memory account table and is the only component allowed to
//! change a balance. Every balance-affecting operation is logged to the
//! [`TransactionLog`] before it is applied in memory, under the table's write
//! lock, so a failed append leaves memory untouched and no reader ever sees a
//! half-applied transfer.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, warn};

use crate::audit::{LogEntry, TransactionLog};
use crate::error::{TellerError, TellerResult};
use crate::models::{Account, Money};

type AccountTable = HashMap<String, Account>;

/// Ordered transaction history of one account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub account: String,
    pub entries: Vec<String>,
}

impl Statement {
    /// No activity yet. Not an error: the account exists.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}

/// Outcome of a successful transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReceipt {
    pub from: String,
    pub to: String,
    pub amount: Money,
    /// Sender balance after the debit
    pub from_balance: Money,
    /// Recipient balance after the credit
    pub to_balance: Money,
}

/// The account ledger
pub struct Ledger {
    accounts: RwLock<AccountTable>,
    log: TransactionLog,
}

impl Ledger {
    /// Create an empty ledger recording to `log`
    pub fn new(log: TransactionLog) -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            log,
        }
    }

    /// The transaction log this ledger records to
    pub fn log(&self) -> &TransactionLog {
        &self.log
    }

    /// Open a new account with a zero balance
    ///
    /// Opening an account is not a transaction and writes nothing to the log.
    /// Names with control characters are rejected since each log entry must
    /// stay on one line. A name containing `": "` is accepted but makes its
    /// log lines ambiguous to `TransactionLog::read_entries`.
    pub fn create_account(&self, name: &str) -> TellerResult<Account> {
        if name.chars().any(char::is_control) {
            return Err(TellerError::Validation(
                "Account name must not contain control characters".into(),
            ));
        }

        let mut accounts = self.write()?;

        if accounts.contains_key(name) {
            return Err(TellerError::account_exists(name));
        }

        let account = Account::new(name);
        accounts.insert(name.to_string(), account.clone());
        debug!(account = name, "account created");

        Ok(account)
    }

    /// Credit `amount` to an account, returning the new balance
    pub fn deposit(&self, name: &str, amount: Money) -> TellerResult<Money> {
        let mut accounts = self.write()?;

        let account = accounts
            .get_mut(name)
            .ok_or_else(|| TellerError::account_not_found(name))?;
        ensure_positive(amount)?;

        let balance = account
            .balance
            .checked_add(amount)
            .ok_or(TellerError::InvalidAmount {
                amount,
                reason: "balance would overflow",
            })?;
        let description = format!("Deposit: ${}", amount.plain());

        self.record(&[LogEntry::new(name, description.as_str())])?;
        account.post(balance, description);
        debug!(account = name, %amount, %balance, "deposit committed");

        Ok(balance)
    }

    /// Debit `amount` from an account, returning the new balance
    pub fn withdraw(&self, name: &str, amount: Money) -> TellerResult<Money> {
        let mut accounts = self.write()?;

        let account = accounts
            .get_mut(name)
            .ok_or_else(|| TellerError::account_not_found(name))?;
        ensure_positive(amount)?;
        ensure_covers(account, amount)?;

        let balance = account.balance - amount;
        let description = format!("Withdrawal: ${}", amount.plain());

        self.record(&[LogEntry::new(name, description.as_str())])?;
        account.post(balance, description);
        debug!(account = name, %amount, %balance, "withdrawal committed");

        Ok(balance)
    }

    /// Current balance of an account
    pub fn check_balance(&self, name: &str) -> TellerResult<Money> {
        self.read()?
            .get(name)
            .map(|account| account.balance)
            .ok_or_else(|| TellerError::account_not_found(name))
    }

    /// Transaction history of an account, oldest first
    pub fn print_statement(&self, name: &str) -> TellerResult<Statement> {
        let accounts = self.read()?;
        let account = accounts
            .get(name)
            .ok_or_else(|| TellerError::account_not_found(name))?;

        Ok(Statement {
            account: account.name.clone(),
            entries: account.transactions.clone(),
        })
    }

    /// Move `amount` from one account to another as a single atomic step
    ///
    /// Checks, in order: sender exists, recipient exists, amount is positive,
    /// sender can cover it. The sender's log line is written before the
    /// recipient's. Transferring to the same account leaves the balance
    /// unchanged but still records both legs.
    pub fn transfer(&self, from: &str, to: &str, amount: Money) -> TellerResult<TransferReceipt> {
        let mut accounts = self.write()?;

        let sender = accounts
            .get(from)
            .ok_or_else(|| TellerError::sender_not_found(from))?;
        let recipient = accounts
            .get(to)
            .ok_or_else(|| TellerError::recipient_not_found(to))?;
        ensure_positive(amount)?;
        ensure_covers(sender, amount)?;

        let from_balance = sender.balance - amount;
        let to_balance = if from == to {
            sender.balance
        } else {
            recipient
                .balance
                .checked_add(amount)
                .ok_or(TellerError::InvalidAmount {
                    amount,
                    reason: "recipient balance would overflow",
                })?
        };

        let debit = format!("Transfer to {}: ${}", to, amount.plain());
        let credit = format!("Transfer from {}: ${}", from, amount.plain());
        self.record(&[
            LogEntry::new(from, debit.as_str()),
            LogEntry::new(to, credit.as_str()),
        ])?;

        if let Some(sender) = accounts.get_mut(from) {
            sender.post(from_balance, debit);
        }
        if let Some(recipient) = accounts.get_mut(to) {
            recipient.post(to_balance, credit);
        }
        debug!(from, to, %amount, "transfer committed");

        Ok(TransferReceipt {
            from: from.to_string(),
            to: to.to_string(),
            amount,
            from_balance: if from == to { to_balance } else { from_balance },
            to_balance,
        })
    }

    /// Remove an account and its in-memory history
    ///
    /// Prior log lines for the name stay in the log. The name may be reused.
    pub fn delete_account(&self, name: &str) -> TellerResult<Account> {
        let removed = self
            .write()?
            .remove(name)
            .ok_or_else(|| TellerError::account_not_found(name))?;
        debug!(account = name, "account deleted");

        Ok(removed)
    }

    /// Snapshot of every account, sorted by name
    pub fn list_accounts(&self) -> TellerResult<Vec<Account>> {
        let mut accounts: Vec<Account> = self.read()?.values().cloned().collect();
        accounts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(accounts)
    }

    pub fn contains(&self, name: &str) -> TellerResult<bool> {
        Ok(self.read()?.contains_key(name))
    }

    pub fn account_count(&self) -> TellerResult<usize> {
        Ok(self.read()?.len())
    }

    fn record(&self, entries: &[LogEntry]) -> TellerResult<()> {
        self.log.append_all(entries).map_err(|err| {
            warn!(error = %err, "transaction log write failed, change not applied");
            err
        })
    }

    fn read(&self) -> TellerResult<RwLockReadGuard<'_, AccountTable>> {
        self.accounts
            .read()
            .map_err(|e| TellerError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> TellerResult<RwLockWriteGuard<'_, AccountTable>> {
        self.accounts
            .write()
            .map_err(|e| TellerError::Storage(format!("Failed to acquire write lock: {}", e)))
    }
}

fn ensure_positive(amount: Money) -> TellerResult<()> {
    if amount.is_positive() {
        Ok(())
    } else {
        Err(TellerError::InvalidAmount {
            amount,
            reason: "amount must be positive",
        })
    }
}

fn ensure_covers(account: &Account, amount: Money) -> TellerResult<()> {
    if account.can_cover(amount) {
        Ok(())
    } else {
        Err(TellerError::InsufficientBalance {
            account: account.name.clone(),
            needed: amount,
            available: account.balance,
        })
    }
}
