//! Service layer for Teller
//!
//! The ledger service enforces every balance invariant and is the only
//! writer of the transaction log.

pub mod ledger;

pub use ledger::{Ledger, Statement, TransferReceipt};
