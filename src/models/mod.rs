//! Core data models for Teller
//!
//! Accounts and the fixed-point money type they are denominated in.

pub mod account;
pub mod money;

pub use account::Account;
pub use money::{Money, MoneyParseError};
