//! Concurrent authorization service
//!
//! This module provides the `ConcurrentAuthorizer`, the thread-safe
//! counterpart of `Authorizer`. It applies the same rules and the same
//! commit protocol over a `SharedAccountStore`, and can be cloned and
//! shared across tasks.
//!
//! # Architecture
//!
//! ```text
//! ConcurrentAuthorizer
//!     ├── Arc<SharedAccountStore>  (per-account locked ledgers)
//!     └── Arc<RuleEngine>          (immutable, shared rule set)
//! ```

use std::sync::Arc;

use super::SharedAccountStore;
use crate::core::rules::{Decision, RuleEngine, RuleInput};
use crate::types::{
    Account, AccountId, AuthorizationResponse, AuthorizerError, CreateAccountRequest,
    ProcessTransactionRequest, Request, Violation,
};

#[derive(Debug, Clone)]
pub struct ConcurrentAuthorizer {
    store: Arc<SharedAccountStore>,
    engine: Arc<RuleEngine>,
}

impl ConcurrentAuthorizer {
    pub fn new(store: Arc<SharedAccountStore>, engine: Arc<RuleEngine>) -> Self {
        Self { store, engine }
    }

    pub fn store(&self) -> &SharedAccountStore {
        &self.store
    }

    /// Dispatch a decoded request to the matching operation
    pub fn handle(&self, request: Request) -> Result<AuthorizationResponse, AuthorizerError> {
        match request {
            Request::CreateAccount(req) => self.create_account(req),
            Request::ProcessTransaction(req) => self.process_transaction(req),
        }
    }

    /// Open an account
    ///
    /// Creation is a single check-and-insert under the account's entry lock,
    /// so two concurrent creations of the same id cannot both succeed.
    pub fn create_account(
        &self,
        request: CreateAccountRequest,
    ) -> Result<AuthorizationResponse, AuthorizerError> {
        let id = request.account.id;

        match self.store.create_account(request.account) {
            Ok(account) => {
                tracing::debug!(account = id, limit = account.available_limit, "account created");
                Ok(AuthorizationResponse::accepted(account))
            }
            Err(AuthorizerError::AlreadyInitialized { .. }) => {
                tracing::warn!(
                    account = id,
                    violation = %Violation::AccountAlreadyInitialized,
                    "account creation rejected"
                );
                Ok(AuthorizationResponse::rejected(
                    self.store.get_account(id),
                    Violation::AccountAlreadyInitialized,
                ))
            }
            Err(e) => Err(e),
        }
    }

    /// Authorize a transaction
    ///
    /// The account's ledger stays locked from the read through the commit.
    pub fn process_transaction(
        &self,
        request: ProcessTransactionRequest,
    ) -> Result<AuthorizationResponse, AuthorizerError> {
        let id = request.account_id;
        let transaction = &request.transaction;

        let outcome = self.store.update(id, |ledger| {
            let decision = self.engine.evaluate(&RuleInput {
                transaction,
                history: ledger.history(),
                account: ledger.account(),
            });

            match decision {
                Decision::Rejected(violation) => Ok(AuthorizationResponse::rejected(
                    ledger.account().clone(),
                    violation,
                )),
                Decision::Accepted => ledger
                    .commit(transaction)
                    .map(AuthorizationResponse::accepted),
            }
        });

        let result = match outcome {
            Some(result) => result,
            None => self.evaluate_missing(id, &request),
        };

        match &result {
            Ok(response) if response.is_accepted() => {
                tracing::debug!(
                    account = id,
                    merchant = %transaction.merchant,
                    amount = transaction.amount,
                    "transaction committed"
                );
            }
            Ok(response) => {
                tracing::warn!(
                    account = id,
                    merchant = %transaction.merchant,
                    violations = ?response.violations,
                    "transaction rejected"
                );
            }
            Err(e) => tracing::error!(account = id, error = %e, "commit failed"),
        }

        result
    }

    /// Evaluate against the zero-value account when the id was never created
    fn evaluate_missing(
        &self,
        id: AccountId,
        request: &ProcessTransactionRequest,
    ) -> Result<AuthorizationResponse, AuthorizerError> {
        let account = Account::empty(id);

        match self.engine.evaluate(&RuleInput {
            transaction: &request.transaction,
            history: &[],
            account: &account,
        }) {
            Decision::Rejected(violation) => {
                Ok(AuthorizationResponse::rejected(account, violation))
            }
            Decision::Accepted => Err(AuthorizerError::account_not_found(id, "commit")),
        }
    }
}
