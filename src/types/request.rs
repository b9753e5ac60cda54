//! Request and response shapes exchanged with the authorization service

use super::account::{Account, AccountId};
use super::transaction::Transaction;
use super::violation::Violation;
use serde::Serialize;

/// Request to open an account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAccountRequest {
    pub account: Account,
}

/// Request to authorize a transaction against an account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessTransactionRequest {
    pub account_id: AccountId,
    pub transaction: Transaction,
}

/// A decoded request of either kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    CreateAccount(CreateAccountRequest),
    ProcessTransaction(ProcessTransactionRequest),
}

impl Request {
    /// The account this request operates on
    pub fn account_id(&self) -> AccountId {
        match self {
            Request::CreateAccount(req) => req.account.id,
            Request::ProcessTransaction(req) => req.account_id,
        }
    }
}

/// Response returned for both operations
///
/// `violations` is empty on success and carries exactly one code when a
/// request is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationResponse {
    pub account: Account,
    pub violations: Vec<Violation>,
}

impl AuthorizationResponse {
    /// Successful response with no violations
    pub fn accepted(account: Account) -> Self {
        AuthorizationResponse {
            account,
            violations: Vec::new(),
        }
    }

    /// Rejected response carrying the unmodified account
    pub fn rejected(account: Account, violation: Violation) -> Self {
        AuthorizationResponse {
            account,
            violations: vec![violation],
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.violations.is_empty()
    }
}
