//! In-memory account store
//!
//! This module provides the `InMemoryAccountStore`, an owned store that keeps
//! one `AccountLedger` per account id for the lifetime of the process.
//!
//! The store is responsible for:
//! - Creating accounts exactly once
//! - Returning snapshots and histories (zero-value / empty when absent)
//! - Applying commits atomically

use crate::core::ledger::AccountLedger;
use crate::core::traits::AccountStore;
use crate::types::{Account, AccountId, AuthorizerError, RecordedTransaction, Transaction};
use chrono::Utc;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Owned in-memory store
///
/// The store is passed into the service by value and owned by it; there is
/// no ambient or global state.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    /// Map of account IDs to ledgers
    ledgers: HashMap<AccountId, AccountLedger>,
}

impl InMemoryAccountStore {
    /// Create a new store with no accounts
    pub fn new() -> Self {
        InMemoryAccountStore {
            ledgers: HashMap::new(),
        }
    }
}

impl AccountStore for InMemoryAccountStore {
    fn create_account(&mut self, account: Account) -> Result<Account, AuthorizerError> {
        match self.ledgers.entry(account.id) {
            Entry::Occupied(_) => Err(AuthorizerError::already_initialized(account.id)),
            Entry::Vacant(slot) => {
                let ledger = slot.insert(AccountLedger::open(account, Utc::now()));
                Ok(ledger.account().clone())
            }
        }
    }

    fn get_account(&self, id: AccountId) -> Account {
        self.ledgers
            .get(&id)
            .map(|ledger| ledger.account().clone())
            .unwrap_or_else(|| Account::empty(id))
    }

    fn get_history(&self, id: AccountId) -> &[RecordedTransaction] {
        self.ledgers
            .get(&id)
            .map(|ledger| ledger.history())
            .unwrap_or(&[])
    }

    fn commit(
        &mut self,
        account: &Account,
        transaction: &Transaction,
    ) -> Result<Account, AuthorizerError> {
        let ledger = self
            .ledgers
            .get_mut(&account.id)
            .ok_or_else(|| AuthorizerError::account_not_found(account.id, "commit"))?;

        if ledger.account() != account {
            return Err(AuthorizerError::stale_snapshot(account.id));
        }

        ledger.commit(transaction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EntryKind;
    use chrono::{DateTime, TimeZone};

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2019, 2, 13, 10, minute, 0).unwrap()
    }

    #[test]
    fn test_new_creates_empty_store() {
        let store = InMemoryAccountStore::new();
        assert_eq!(store.get_account(1), Account::empty(1));
        assert!(store.get_history(1).is_empty());
    }

    #[test]
    fn test_create_account_records_state_and_opening_entry() {
        let mut store = InMemoryAccountStore::new();

        let account = store.create_account(Account::new(1, true, 100)).unwrap();

        assert_eq!(account, Account::new(1, true, 100));
        assert_eq!(store.get_account(1), account);
        assert_eq!(store.get_history(1).len(), 1);
        assert_eq!(store.get_history(1)[0].kind, EntryKind::Opening);
        assert_eq!(store.get_history(1)[0].amount, 100);
    }

    #[test]
    fn test_create_account_twice_fails_without_mutation() {
        let mut store = InMemoryAccountStore::new();
        store.create_account(Account::new(1, false, 100)).unwrap();

        let result = store.create_account(Account::new(1, true, 999));

        assert_eq!(result.unwrap_err(), AuthorizerError::already_initialized(1));
        assert_eq!(store.get_account(1), Account::new(1, false, 100));
        assert_eq!(store.get_history(1).len(), 1);
    }

    #[test]
    fn test_get_account_returns_empty_for_unknown_id() {
        let store = InMemoryAccountStore::new();

        assert_eq!(store.get_account(42), Account::empty(42));
    }

    #[test]
    fn test_get_history_returns_empty_for_unknown_id() {
        let store = InMemoryAccountStore::new();
        assert!(store.get_history(42).is_empty());
    }

    #[test]
    fn test_commit_updates_account_and_history() {
        let mut store = InMemoryAccountStore::new();
        let account = store.create_account(Account::new(1, true, 100)).unwrap();

        let updated = store
            .commit(&account, &Transaction::new("Burger King", 20, at(0)))
            .unwrap();

        assert_eq!(updated.available_limit, 80);
        assert_eq!(store.get_account(1).available_limit, 80);
        assert_eq!(store.get_history(1).len(), 2);
        assert_eq!(store.get_history(1)[1].merchant, "Burger King");
    }

    #[test]
    fn test_commit_to_unknown_account_fails() {
        let mut store = InMemoryAccountStore::new();

        let result = store.commit(&Account::new(5, true, 100), &Transaction::new("A", 1, at(0)));

        assert!(matches!(
            result.unwrap_err(),
            AuthorizerError::AccountNotFound { account: 5, .. }
        ));
        assert!(store.get_history(5).is_empty());
    }

    #[test]
    fn test_commit_with_stale_snapshot_is_refused() {
        let mut store = InMemoryAccountStore::new();
        let snapshot = store.create_account(Account::new(1, true, 100)).unwrap();
        store
            .commit(&snapshot, &Transaction::new("A", 30, at(0)))
            .unwrap();

        // Reusing the pre-commit snapshot must not apply a second deduction
        let result = store.commit(&snapshot, &Transaction::new("B", 30, at(1)));

        assert_eq!(result.unwrap_err(), AuthorizerError::stale_snapshot(1));
        assert_eq!(store.get_account(1).available_limit, 70);
        assert_eq!(store.get_history(1).len(), 2);
    }

    #[test]
    fn test_accounts_are_independent() {
        let mut store = InMemoryAccountStore::new();
        let first = store.create_account(Account::new(1, true, 100)).unwrap();
        store.create_account(Account::new(2, true, 200)).unwrap();

        store
            .commit(&first, &Transaction::new("A", 50, at(0)))
            .unwrap();

        assert_eq!(store.get_account(1).available_limit, 50);
        assert_eq!(store.get_account(2).available_limit, 200);
        assert_eq!(store.get_history(2).len(), 1);
    }
}
