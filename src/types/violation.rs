//! Violation codes
//!
//! A violation names the business rule that rejected a request. Codes are
//! stable strings; the enum is the closed vocabulary the engine can emit.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Violation {
    /// Creation requested for an account that already exists
    AccountAlreadyInitialized,

    /// The account's card is not active
    CardNotActive,

    /// The amount exceeds the available limit
    InsufficientLimit,

    /// Same merchant and amount seen inside the duplicate window
    DuplicateTransaction,

    /// Too many transactions inside the frequency window
    HighFrequencySmallInterval,
}

impl Violation {
    pub const ALL: [Violation; 5] = [
        Violation::AccountAlreadyInitialized,
        Violation::CardNotActive,
        Violation::InsufficientLimit,
        Violation::DuplicateTransaction,
        Violation::HighFrequencySmallInterval,
    ];

    /// The stable wire code
    pub fn as_str(&self) -> &'static str {
        match self {
            Violation::AccountAlreadyInitialized => "account-already-initialized",
            Violation::CardNotActive => "card-not-active",
            Violation::InsufficientLimit => "insufficient-limit",
            Violation::DuplicateTransaction => "duplicate-transaction",
            Violation::HighFrequencySmallInterval => "high-frequency-small-interval",
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Violation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Violation::ALL
            .into_iter()
            .find(|v| v.as_str() == s.trim())
            .ok_or_else(|| format!("unknown violation code '{}'", s))
    }
}
