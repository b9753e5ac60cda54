//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account snapshot and identifiers
//! - `transaction`: Candidate and recorded transactions
//! - `violation`: Violation code vocabulary
//! - `request`: Request and response shapes of the service
//! - `error`: Error types for the authorizer

pub mod account;
pub mod error;
pub mod request;
pub mod transaction;
pub mod violation;

pub use account::{Account, AccountId, Amount, DEFAULT_ACCOUNT_ID};
pub use error::AuthorizerError;
pub use request::{AuthorizationResponse, CreateAccountRequest, ProcessTransactionRequest, Request};
pub use transaction::{EntryKind, RecordedTransaction, Transaction, OPENING_MERCHANT};
pub use violation::Violation;
