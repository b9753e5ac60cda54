//! Core traits for account storage
//!
//! The authorization service is generic over `AccountStore`, so the
//! in-memory store can be swapped for a persistent backend without touching
//! the rule evaluation or the commit protocol.

use crate::types::{Account, AccountId, AuthorizerError, RecordedTransaction, Transaction};

/// Trait for holding account state and history
///
/// The store never rejects a transaction on business grounds; that is the
/// rule engine's job, and it runs strictly before `commit`.
pub trait AccountStore {
    /// Record a new account and seed its history with the opening entry
    ///
    /// # Errors
    ///
    /// Returns `AlreadyInitialized` if an account with the same id exists.
    fn create_account(&mut self, account: Account) -> Result<Account, AuthorizerError>;

    /// Current account snapshot, or `Account::empty(id)` if none exists
    fn get_account(&self, id: AccountId) -> Account;

    /// All committed transactions in commit order, empty if none exist
    fn get_history(&self, id: AccountId) -> &[RecordedTransaction];

    /// Deduct the amount, append the transaction, and persist the snapshot
    ///
    /// `account` is the snapshot the caller evaluated the rules against.
    /// The commit is refused if the stored state no longer matches it.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the account is missing, stale, or the
    /// deduction cannot be applied. Nothing is written in that case.
    fn commit(
        &mut self,
        account: &Account,
        transaction: &Transaction,
    ) -> Result<Account, AuthorizerError>;
}
