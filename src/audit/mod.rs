//! Durable record of committed ledger events
//!
//! The transaction log is an audit trail, not a recovery source: the ledger
//! writes to it and never reads it back.
//!
//! # Example
//!
//! ```rust,ignore
//! use teller::audit::TransactionLog;
//!
//! let log = TransactionLog::new("transactions.txt");
//! log.append("alice", "Deposit: $100")?;
//! ```

mod log;

pub use log::{LogEntry, TransactionLog};
