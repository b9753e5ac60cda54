//! Account-related types for the card authorizer
//!
//! This module defines the Account snapshot that the store keeps, the rule
//! engine inspects, and every response carries back to the caller.

use serde::{Deserialize, Serialize};

/// Account identifier
pub type AccountId = u64;

/// Currency amount in minor units
pub type Amount = i64;

/// Identifier used when a request does not name an account
///
/// The single-account deployment always operates on account 1.
pub const DEFAULT_ACCOUNT_ID: AccountId = 1;

fn default_account_id() -> AccountId {
    DEFAULT_ACCOUNT_ID
}

/// Account state snapshot
///
/// Serialized with the kebab-case field names of the line protocol
/// (`active-card`, `available-limit`); camelCase spellings are accepted
/// on input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Account {
    /// The account ID
    #[serde(default = "default_account_id")]
    pub id: AccountId,

    /// Whether the card may be used
    ///
    /// A transaction can only be authorized while this is true.
    #[serde(alias = "activeCard")]
    pub active_card: bool,

    /// Remaining limit
    ///
    /// Decreases by the amount of each committed transaction and is never
    /// touched by a rejected one.
    #[serde(alias = "availableLimit")]
    pub available_limit: Amount,
}

impl Account {
    /// Create an account snapshot
    pub fn new(id: AccountId, active_card: bool, available_limit: Amount) -> Self {
        Account {
            id,
            active_card,
            available_limit,
        }
    }

    /// The zero-value account returned for ids that were never created
    ///
    /// # Returns
    ///
    /// An Account with:
    /// - active_card = false
    /// - available_limit = 0
    pub fn empty(id: AccountId) -> Self {
        Account::new(id, false, 0)
    }
}
