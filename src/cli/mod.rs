//! Command-line front end
//!
//! The interactive shell drives one [`Ledger`](crate::services::Ledger) for
//! the life of the process and renders its results.

pub mod shell;

pub use shell::{split_words, Reply, Shell, ShellCommand};
