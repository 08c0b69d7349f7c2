//! Custom error types for Teller
//!
//! Every ledger operation reports failure through [`TellerError`]. The first
//! group of variants is the ledger taxonomy the front end renders to the user;
//! the rest cover configuration, settings persistence and shell input.

use thiserror::Error;

use crate::models::Money;

/// The main error type for Teller operations
#[derive(Error, Debug)]
pub enum TellerError {
    /// An account with this name is already open
    #[error("{entity_type} already exists: {identifier}")]
    AlreadyExists {
        entity_type: &'static str,
        identifier: String,
    },

    /// Referenced account is not in the ledger
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Amount was zero, negative, or would overflow a balance
    #[error("Invalid amount {amount}: {reason}")]
    InvalidAmount { amount: Money, reason: &'static str },

    /// Withdrawal or transfer would drive the balance negative
    #[error("Insufficient balance in '{account}': need {needed}, have {available}")]
    InsufficientBalance {
        account: String,
        needed: Money,
        available: Money,
    },

    /// The durable transaction log could not be written
    #[error("Transaction log error: {0}")]
    LogWrite(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors outside the transaction log
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Malformed user input
    #[error("Validation error: {0}")]
    Validation(String),

    /// In-memory table errors (poisoned locks)
    #[error("Storage error: {0}")]
    Storage(String),
}

impl TellerError {
    /// Create a "not found" error for an account referenced directly
    pub fn account_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Account",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for the debit side of a transfer
    pub fn sender_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Sender account",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for the credit side of a transfer
    pub fn recipient_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Recipient account",
            identifier: identifier.into(),
        }
    }

    /// Create an "already exists" error for accounts
    pub fn account_exists(identifier: impl Into<String>) -> Self {
        Self::AlreadyExists {
            entity_type: "Account",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if the transaction log rejected the write
    pub fn is_log_write(&self) -> bool {
        matches!(self, Self::LogWrite(_))
    }
}

impl From<std::io::Error> for TellerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for TellerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for Teller operations
pub type TellerResult<T> = Result<T, TellerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let err = TellerError::account_not_found("alice");
        assert_eq!(err.to_string(), "Account not found: alice");
        assert!(err.is_not_found());

        let err = TellerError::recipient_not_found("bob");
        assert_eq!(err.to_string(), "Recipient account not found: bob");
    }

    #[test]
    fn test_already_exists_error() {
        let err = TellerError::account_exists("alice");
        assert_eq!(err.to_string(), "Account already exists: alice");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_insufficient_balance_error() {
        let err = TellerError::InsufficientBalance {
            account: "acct".into(),
            needed: Money::from_cents(10_000),
            available: Money::from_cents(5_000),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient balance in 'acct': need $100.00, have $50.00"
        );
    }

    #[test]
    fn test_invalid_amount_error() {
        let err = TellerError::InvalidAmount {
            amount: Money::from_cents(-250),
            reason: "amount must be positive",
        };
        assert_eq!(err.to_string(), "Invalid amount -$2.50: amount must be positive");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: TellerError = io_err.into();
        assert!(matches!(err, TellerError::Io(_)));
        assert!(!err.is_log_write());
    }
}
