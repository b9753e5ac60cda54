//! Per-account ledger
//!
//! An `AccountLedger` pairs one account snapshot with its append-only
//! history. Both store implementations keep one ledger per account and
//! delegate the commit protocol to it, so the balance deduction and the
//! history append always happen together or not at all.

use crate::types::{Account, AuthorizerError, RecordedTransaction, Transaction};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct AccountLedger {
    account: Account,
    history: Vec<RecordedTransaction>,
}

impl AccountLedger {
    /// Open a ledger, seeding the history with the opening entry
    ///
    /// # Arguments
    ///
    /// * `account` - The initial account state
    /// * `opened_at` - Timestamp recorded on the opening entry
    pub fn open(account: Account, opened_at: DateTime<Utc>) -> Self {
        let opening = RecordedTransaction::opening(account.available_limit, opened_at);

        AccountLedger {
            account,
            history: vec![opening],
        }
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    /// All recorded transactions in commit order
    pub fn history(&self) -> &[RecordedTransaction] {
        &self.history
    }

    /// Deduct the amount and append the transaction to the history
    ///
    /// The new limit is computed before anything is written, so a failed
    /// commit leaves the ledger untouched.
    ///
    /// # Returns
    ///
    /// * `Ok(Account)` - The updated account snapshot
    /// * `Err(AuthorizerError)` - If the deduction would underflow
    pub fn commit(&mut self, transaction: &Transaction) -> Result<Account, AuthorizerError> {
        let new_limit = self
            .account
            .available_limit
            .checked_sub(transaction.amount)
            .ok_or_else(|| AuthorizerError::arithmetic_underflow("commit", self.account.id))?;

        let sequence = self.history.len() as u64;
        self.history
            .push(RecordedTransaction::purchase(transaction, sequence));
        self.account.available_limit = new_limit;

        Ok(self.account.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EntryKind;
    use chrono::TimeZone;

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2019, 2, 13, 10, minute, 0).unwrap()
    }

    #[test]
    fn test_open_seeds_opening_entry() {
        let ledger = AccountLedger::open(Account::new(1, true, 100), at(0));

        assert_eq!(ledger.history().len(), 1);
        assert_eq!(ledger.history()[0].kind, EntryKind::Opening);
        assert_eq!(ledger.history()[0].amount, 100);
        assert_eq!(ledger.account().available_limit, 100);
    }

    #[test]
    fn test_commit_deducts_and_appends() {
        let mut ledger = AccountLedger::open(Account::new(1, true, 100), at(0));

        let account = ledger
            .commit(&Transaction::new("Burger King", 20, at(1)))
            .unwrap();

        assert_eq!(account.available_limit, 80);
        assert_eq!(ledger.account().available_limit, 80);
        assert_eq!(ledger.history().len(), 2);
        assert_eq!(ledger.history()[1].sequence, 1);
        assert_eq!(ledger.history()[1].merchant, "Burger King");
    }

    #[test]
    fn test_commit_sequences_follow_commit_order() {
        let mut ledger = AccountLedger::open(Account::new(1, true, 100), at(0));

        // Later timestamp committed first: sequence follows commit order, not time
        ledger.commit(&Transaction::new("A", 10, at(5))).unwrap();
        ledger.commit(&Transaction::new("B", 10, at(3))).unwrap();

        let sequences: Vec<u64> = ledger.history().iter().map(|t| t.sequence).collect();
        assert_eq!(sequences, vec![0, 1, 2]);
        assert_eq!(ledger.history()[2].merchant, "B");
    }

    #[test]
    fn test_commit_underflow_leaves_ledger_unchanged() {
        let mut ledger = AccountLedger::open(Account::new(1, true, i64::MIN + 1), at(0));

        let result = ledger.commit(&Transaction::new("Nike", 10, at(1)));

        assert!(matches!(
            result.unwrap_err(),
            AuthorizerError::ArithmeticUnderflow { .. }
        ));
        assert_eq!(ledger.history().len(), 1);
        assert_eq!(ledger.account().available_limit, i64::MIN + 1);
    }
}
