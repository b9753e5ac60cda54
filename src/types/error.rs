//! Error types for the card authorizer
//!
//! Business rejections are not errors: they travel back to the caller as
//! violations inside a well-formed response. This enum covers the failures
//! that mean the system could not decode a request, or could not determine
//! or record the truth.
//!
//! # Error Categories
//!
//! - **I/O Errors**: input cannot be opened or read, output cannot be written
//! - **Decoding Errors**: malformed JSON lines, invalid amounts, ambiguous requests
//! - **Storage Errors**: duplicate creation, missing account, limit underflow
//! - **Configuration Errors**: values that cannot form a valid rule set

use super::account::{AccountId, Amount};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AuthorizerError {
    /// Input file not found at the specified path
    ///
    /// This is a fatal error that prevents processing from starting.
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading input or writing responses
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// A request line could not be decoded
    ///
    /// Recoverable: the line is skipped and processing continues.
    #[error(
        "Parse error{}: {message}",
        line.map(|l| format!(" at line {}", l)).unwrap_or_default()
    )]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// A line named neither or both of `account` and `transaction`
    ///
    /// Recoverable: the line is skipped.
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// Transaction amount is zero or negative
    ///
    /// Recoverable: the line is skipped.
    #[error("Invalid amount {amount} for merchant '{merchant}'")]
    InvalidAmount { amount: Amount, merchant: String },

    /// Creation requested for an account that already exists in the store
    ///
    /// The service reports this to the caller as the
    /// `account-already-initialized` violation.
    #[error("Account {account} is already initialized")]
    AlreadyInitialized { account: AccountId },

    /// Commit attempted against an account the store does not hold
    #[error("Account {account} not found for {operation}")]
    AccountNotFound {
        account: AccountId,
        operation: String,
    },

    /// The account changed between the read and the commit
    #[error("Account {account} changed since it was read; commit refused")]
    StaleSnapshot { account: AccountId },

    /// Deducting the amount would underflow the available limit
    #[error("Arithmetic underflow in {operation} for account {account}")]
    ArithmeticUnderflow {
        /// Operation that would underflow
        operation: String,
        account: AccountId,
    },

    /// The storage backend failed to read or persist state
    #[error("Storage failure in {operation}: {message}")]
    StorageFailure { operation: String, message: String },

    /// A worker task panicked or was cancelled
    #[error("Worker task failed: {message}")]
    TaskFailed { message: String },

    /// Configuration value cannot be used
    #[error("Invalid configuration for {field}: {message}")]
    InvalidConfig { field: String, message: String },
}

impl From<std::io::Error> for AuthorizerError {
    fn from(error: std::io::Error) -> Self {
        AuthorizerError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for AuthorizerError {
    fn from(error: serde_json::Error) -> Self {
        if error.is_io() {
            return AuthorizerError::IoError {
                message: error.to_string(),
            };
        }

        AuthorizerError::ParseError {
            line: None,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl AuthorizerError {
    /// Create an AlreadyInitialized error
    pub fn already_initialized(account: AccountId) -> Self {
        AuthorizerError::AlreadyInitialized { account }
    }

    /// Create an AccountNotFound error
    pub fn account_not_found(account: AccountId, operation: &str) -> Self {
        AuthorizerError::AccountNotFound {
            account,
            operation: operation.to_string(),
        }
    }

    /// Create a StaleSnapshot error
    pub fn stale_snapshot(account: AccountId) -> Self {
        AuthorizerError::StaleSnapshot { account }
    }

    /// Create an ArithmeticUnderflow error
    pub fn arithmetic_underflow(operation: &str, account: AccountId) -> Self {
        AuthorizerError::ArithmeticUnderflow {
            operation: operation.to_string(),
            account,
        }
    }

    /// Create a StorageFailure error
    pub fn storage_failure(operation: &str, message: impl Into<String>) -> Self {
        AuthorizerError::StorageFailure {
            operation: operation.to_string(),
            message: message.into(),
        }
    }

    /// Create a ParseError error
    pub fn parse_error(line: Option<u64>, message: impl Into<String>) -> Self {
        AuthorizerError::ParseError {
            line,
            message: message.into(),
        }
    }

    /// Create an InvalidRequest error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        AuthorizerError::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: Amount, merchant: &str) -> Self {
        AuthorizerError::InvalidAmount {
            amount,
            merchant: merchant.to_string(),
        }
    }

    /// Create an InvalidConfig error
    pub fn invalid_config(field: &str, message: impl Into<String>) -> Self {
        AuthorizerError::InvalidConfig {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Attach a line number to a decoding error
    pub fn at_line(self, line: u64) -> Self {
        match self {
            AuthorizerError::ParseError { message, .. } => AuthorizerError::ParseError {
                line: Some(line),
                message,
            },
            other => other,
        }
    }

    /// Whether the error only affects a single input line
    ///
    /// Strategies log and skip recoverable errors; anything else aborts.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AuthorizerError::ParseError { .. }
                | AuthorizerError::InvalidRequest { .. }
                | AuthorizerError::InvalidAmount { .. }
        )
    }
}
