//! Authorization service
//!
//! This module provides the `Authorizer`, the single entry point a caller
//! uses per request. It orchestrates account creation and transaction
//! processing by coordinating the `RuleEngine` and an `AccountStore`.
//!
//! Side effects are confined to the accept path: a rejected request leaves
//! the store exactly as it found it, so re-submitting it is always safe.

use crate::core::rules::{Decision, RuleEngine, RuleInput};
use crate::core::traits::AccountStore;
use crate::types::{
    AuthorizationResponse, AuthorizerError, CreateAccountRequest, ProcessTransactionRequest,
    Request, Violation,
};

/// Single-stream authorization service
///
/// Owns its store; requests are processed one at a time through `&mut self`.
pub struct Authorizer<S: AccountStore> {
    store: S,
    engine: RuleEngine,
}

impl<S: AccountStore> Authorizer<S> {
    /// Create a new Authorizer over the given store and rule engine
    pub fn new(store: S, engine: RuleEngine) -> Self {
        Authorizer { store, engine }
    }

    /// Read access to the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Dispatch a decoded request to the matching operation
    pub fn handle(&mut self, request: Request) -> Result<AuthorizationResponse, AuthorizerError> {
        match request {
            Request::CreateAccount(req) => self.create_account(req),
            Request::ProcessTransaction(req) => self.process_transaction(req),
        }
    }

    /// Open an account
    ///
    /// An existing account is never modified. Re-creating it is reported as
    /// the `account-already-initialized` violation together with the stored
    /// account state.
    ///
    /// # Errors
    ///
    /// Returns an error only if the store fails for a reason other than the
    /// account already existing.
    pub fn create_account(
        &mut self,
        request: CreateAccountRequest,
    ) -> Result<AuthorizationResponse, AuthorizerError> {
        let id = request.account.id;

        let existing = self.store.get_account(id);
        if existing.active_card {
            tracing::warn!(
                account = id,
                violation = %Violation::AccountAlreadyInitialized,
                "account creation rejected"
            );
            return Ok(AuthorizationResponse::rejected(
                existing,
                Violation::AccountAlreadyInitialized,
            ));
        }

        match self.store.create_account(request.account) {
            Ok(account) => {
                tracing::debug!(
                    account = id,
                    limit = account.available_limit,
                    active_card = account.active_card,
                    "account created"
                );
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
            Err(e) => {
                tracing::error!(account = id, error = %e, "account creation failed");
                Err(e)
            }
        }
    }

    /// Authorize a transaction
    ///
    /// Loads the account and its history, evaluates the rules, and commits
    /// only when no rule fires.
    ///
    /// # Returns
    ///
    /// * `Ok(response)` with no violations and the updated account on accept
    /// * `Ok(response)` with one violation and the unmodified account on reject
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails to commit an accepted transaction.
    pub fn process_transaction(
        &mut self,
        request: ProcessTransactionRequest,
    ) -> Result<AuthorizationResponse, AuthorizerError> {
        let id = request.account_id;
        let account = self.store.get_account(id);

        let decision = self.engine.evaluate(&RuleInput {
            transaction: &request.transaction,
            history: self.store.get_history(id),
            account: &account,
        });

        match decision {
            Decision::Rejected(violation) => {
                tracing::warn!(
                    account = id,
                    merchant = %request.transaction.merchant,
                    amount = request.transaction.amount,
                    violation = %violation,
                    "transaction rejected"
                );
                Ok(AuthorizationResponse::rejected(account, violation))
            }
            Decision::Accepted => {
                let updated = self
                    .store
                    .commit(&account, &request.transaction)
                    .inspect_err(|e| tracing::error!(account = id, error = %e, "commit failed"))?;

                tracing::debug!(
                    account = id,
                    merchant = %request.transaction.merchant,
                    amount = request.transaction.amount,
                    remaining = updated.available_limit,
                    "transaction committed"
                );
                Ok(AuthorizationResponse::accepted(updated))
            }
        }
    }
}
