//! Transaction-related types for the card authorizer
//!
//! This module defines the candidate transaction submitted by a caller and
//! the immutable recorded form the store appends to an account's history.

use super::account::Amount;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Merchant label recorded on the synthetic opening entry
pub const OPENING_MERCHANT: &str = "initial";

/// Candidate transaction as submitted by the caller
///
/// `time` is trusted as authoritative for the history-window rules; it is
/// never compared against the wall clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Free-text merchant label
    pub merchant: String,

    /// Amount to deduct from the available limit (positive)
    pub amount: Amount,

    /// When the transaction occurred
    pub time: DateTime<Utc>,
}

impl Transaction {
    pub fn new(merchant: impl Into<String>, amount: Amount, time: DateTime<Utc>) -> Self {
        Transaction {
            merchant: merchant.into(),
            amount,
            time,
        }
    }
}

/// Kind of a history entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Synthetic entry written at account creation holding the opening limit
    ///
    /// Never inspected by the history-window rules.
    Opening,

    /// A committed card transaction
    Purchase,
}

/// Transaction as recorded in an account's history
///
/// Recorded transactions are immutable and ordered by `sequence`, which is
/// the commit order. Commit order agrees with, but is not derived from,
/// the caller-supplied `time`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedTransaction {
    /// Unique identifier assigned at commit time
    pub id: Uuid,

    /// Position in the account's history (0 is the opening entry)
    pub sequence: u64,

    pub kind: EntryKind,
    pub merchant: String,
    pub amount: Amount,
    pub time: DateTime<Utc>,
}

impl RecordedTransaction {
    /// Record the synthetic opening entry for a freshly created account
    pub fn opening(available_limit: Amount, time: DateTime<Utc>) -> Self {
        RecordedTransaction {
            id: Uuid::new_v4(),
            sequence: 0,
            kind: EntryKind::Opening,
            merchant: OPENING_MERCHANT.to_string(),
            amount: available_limit,
            time,
        }
    }

    /// Record a committed transaction at the given position
    pub fn purchase(transaction: &Transaction, sequence: u64) -> Self {
        RecordedTransaction {
            id: Uuid::new_v4(),
            sequence,
            kind: EntryKind::Purchase,
            merchant: transaction.merchant.clone(),
            amount: transaction.amount,
            time: transaction.time,
        }
    }

    /// Whether this entry is a committed card transaction
    pub fn is_purchase(&self) -> bool {
        self.kind == EntryKind::Purchase
    }
}
