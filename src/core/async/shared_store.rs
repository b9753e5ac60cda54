//! Thread-safe account store for concurrent authorization
//!
//! This module provides `SharedAccountStore`, which keeps one `AccountLedger`
//! per account inside a `DashMap`. Holding a ledger's map entry is the
//! per-account exclusive lock: the read-evaluate-commit sequence runs while
//! the entry is held, so no other commit for the same account can interleave.
//! Operations on different accounts proceed in parallel.

use crate::core::ledger::AccountLedger;
use crate::types::{Account, AccountId, AuthorizerError, RecordedTransaction};
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

#[derive(Debug, Default)]
pub struct SharedAccountStore {
    /// Concurrent map of account IDs to ledgers
    ///
    /// DashMap shards its locks, so different accounts rarely contend.
    ledgers: DashMap<AccountId, AccountLedger>,
}

impl SharedAccountStore {
    pub fn new() -> Self {
        Self {
            ledgers: DashMap::new(),
        }
    }

    /// Record a new account and seed its history with the opening entry
    ///
    /// The existence check and the insert happen under the same entry lock.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyInitialized` if the account already exists.
    pub fn create_account(&self, account: Account) -> Result<Account, AuthorizerError> {
        match self.ledgers.entry(account.id) {
            Entry::Occupied(_) => Err(AuthorizerError::already_initialized(account.id)),
            Entry::Vacant(slot) => {
                let ledger = slot.insert(AccountLedger::open(account, Utc::now()));
                Ok(ledger.account().clone())
            }
        }
    }

    /// Snapshot of the account, or `Account::empty(id)` if it doesn't exist
    ///
    /// The returned value is a copy; concurrent commits are not reflected.
    pub fn get_account(&self, id: AccountId) -> Account {
        self.ledgers
            .get(&id)
            .map(|ledger| ledger.account().clone())
            .unwrap_or_else(|| Account::empty(id))
    }

    /// Copy of the account's history in commit order
    pub fn get_history(&self, id: AccountId) -> Vec<RecordedTransaction> {
        self.ledgers
            .get(&id)
            .map(|ledger| ledger.history().to_vec())
            .unwrap_or_default()
    }

    /// Run a closure with exclusive access to one account's ledger
    ///
    /// The entry stays locked for the whole closure, which is what makes a
    /// read-evaluate-commit sequence atomic for that account.
    ///
    /// # Returns
    ///
    /// * `Some(T)` - The closure's result, if the account exists
    /// * `None` - If the account has not been created
    pub fn update<F, T>(&self, id: AccountId, f: F) -> Option<T>
    where
        F: FnOnce(&mut AccountLedger) -> T,
    {
        self.ledgers
            .get_mut(&id)
            .map(|mut ledger| f(ledger.value_mut()))
    }
}
