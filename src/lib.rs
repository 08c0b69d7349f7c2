//! Teller - named monetary accounts with an append-only transaction log
//!
//! This library provides the account ledger behind the `teller` shell. Every
//! balance-affecting operation is written to a plain-text transaction log
//! before it is applied in memory, so the two never disagree.
//!
//! # Architecture
//!
//! - `models`: fixed-point [`Money`](models::Money) and [`Account`](models::Account)
//! - `audit`: the append-only [`TransactionLog`](audit::TransactionLog)
//! - `services`: the [`Ledger`](services::Ledger), which owns the account table
//! - `config`: config directory, settings and log location
//! - `display`: terminal formatting
//! - `cli`: the interactive shell
//! - `logging`: diagnostic tracing setup
//!
//! # Example
//!
//! ```rust,no_run
//! use teller::audit::TransactionLog;
//! use teller::models::Money;
//! use teller::services::Ledger;
//!
//! # fn main() -> teller::error::TellerResult<()> {
//! let ledger = Ledger::new(TransactionLog::new("transactions.txt"));
//! ledger.create_account("alice")?;
//! ledger.deposit("alice", Money::parse("100").unwrap())?;
//! # Ok(())
//! # }
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;

pub use error::{TellerError, TellerResult};
