//! Business rule engine
//!
//! This module provides the `RuleEngine`, which decides whether a candidate
//! transaction may be committed. Each rule is an independent, pure predicate
//! over the candidate, the account's history, and the account snapshot.
//!
//! # Evaluation Order
//!
//! Rules run in an explicit, ordered sequence and evaluation stops at the
//! first rule that fires. Several rules can hold for the same transaction
//! (an inactive card with an over-limit amount, say), so the order decides
//! which single violation the caller sees. The default order is:
//!
//! 1. `card-not-active`
//! 2. `insufficient-limit`
//! 3. `duplicate-transaction`
//! 4. `high-frequency-small-interval`
//!
//! # Time Windows
//!
//! The window rules look at history entries whose time lies in the closed
//! interval `[candidate.time - window, candidate.time]`. Opening entries
//! are never inspected.

use crate::types::{Account, AuthorizerError, RecordedTransaction, Transaction, Violation};
use chrono::{DateTime, Duration, Utc};
use std::fmt;
use std::str::FromStr;

/// Default trailing window for `duplicate-transaction`, in seconds
pub const DEFAULT_DUPLICATE_WINDOW_SECS: u32 = 120;

/// Default trailing window for `high-frequency-small-interval`, in seconds
pub const DEFAULT_FREQUENCY_WINDOW_SECS: u32 = 120;

/// Default number of prior transactions that saturates the frequency window
pub const DEFAULT_FREQUENCY_THRESHOLD: usize = 3;

/// Everything a rule may look at
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    pub transaction: &'a Transaction,
    pub history: &'a [RecordedTransaction],
    pub account: &'a Account,
}

/// Outcome of evaluating the rule set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Accepted,
    Rejected(Violation),
}

impl Decision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Decision::Accepted)
    }

    /// The violation that rejected the transaction, if any
    pub fn violation(&self) -> Option<Violation> {
        match self {
            Decision::Accepted => None,
            Decision::Rejected(violation) => Some(*violation),
        }
    }
}

/// A single business rule
///
/// Each variant maps to one pure predicate; adding a rule means adding a
/// variant and its predicate, never touching the orchestration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    CardNotActive,
    InsufficientLimit,
    DuplicateTransaction,
    HighFrequencySmallInterval,
}

impl Rule {
    /// Default evaluation order
    pub const DEFAULT_ORDER: [Rule; 4] = [
        Rule::CardNotActive,
        Rule::InsufficientLimit,
        Rule::DuplicateTransaction,
        Rule::HighFrequencySmallInterval,
    ];

    /// The violation reported when this rule fires
    pub fn violation(&self) -> Violation {
        match self {
            Rule::CardNotActive => Violation::CardNotActive,
            Rule::InsufficientLimit => Violation::InsufficientLimit,
            Rule::DuplicateTransaction => Violation::DuplicateTransaction,
            Rule::HighFrequencySmallInterval => Violation::HighFrequencySmallInterval,
        }
    }

    /// Whether this rule fires for the given input
    pub fn fires(&self, input: &RuleInput<'_>, config: &RuleConfig) -> bool {
        match self {
            Rule::CardNotActive => card_not_active(input),
            Rule::InsufficientLimit => insufficient_limit(input),
            Rule::DuplicateTransaction => duplicate_transaction(input, config.duplicate_window),
            Rule::HighFrequencySmallInterval => high_frequency_small_interval(
                input,
                config.frequency_window,
                config.frequency_threshold,
            ),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.violation().as_str())
    }
}

impl FromStr for Rule {
    type Err = String;

    /// Parse a rule from the code of the violation it reports
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rule::DEFAULT_ORDER
            .into_iter()
            .find(|rule| rule.violation().as_str() == s.trim())
            .ok_or_else(|| format!("unknown rule '{}'", s))
    }
}

fn card_not_active(input: &RuleInput<'_>) -> bool {
    !input.account.active_card
}

fn insufficient_limit(input: &RuleInput<'_>) -> bool {
    input.transaction.amount > input.account.available_limit
}

fn duplicate_transaction(input: &RuleInput<'_>, window: Duration) -> bool {
    let candidate = input.transaction;
    input.history.iter().any(|past| {
        in_window(past, candidate.time, window)
            && past.merchant == candidate.merchant
            && past.amount == candidate.amount
    })
}

fn high_frequency_small_interval(
    input: &RuleInput<'_>,
    window: Duration,
    threshold: usize,
) -> bool {
    let recent = input
        .history
        .iter()
        .filter(|past| in_window(past, input.transaction.time, window))
        .count();
    recent >= threshold
}

/// Whether a committed purchase lies in `[at - window, at]`
fn in_window(entry: &RecordedTransaction, at: DateTime<Utc>, window: Duration) -> bool {
    entry.is_purchase() && entry.time <= at && at - entry.time <= window
}

/// Tunable parameters of the rule set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleConfig {
    pub duplicate_window: Duration,
    pub frequency_window: Duration,
    pub frequency_threshold: usize,

    /// Rules to evaluate, in priority order
    pub rules: Vec<Rule>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            duplicate_window: Duration::seconds(DEFAULT_DUPLICATE_WINDOW_SECS.into()),
            frequency_window: Duration::seconds(DEFAULT_FREQUENCY_WINDOW_SECS.into()),
            frequency_threshold: DEFAULT_FREQUENCY_THRESHOLD,
            rules: Rule::DEFAULT_ORDER.to_vec(),
        }
    }
}

impl RuleConfig {
    /// Build a validated configuration
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the threshold is zero (every transaction
    /// would be rejected) or a rule is listed more than once.
    pub fn new(
        duplicate_window_secs: u32,
        frequency_window_secs: u32,
        frequency_threshold: usize,
        rules: Vec<Rule>,
    ) -> Result<Self, AuthorizerError> {
        if frequency_threshold == 0 {
            return Err(AuthorizerError::invalid_config(
                "frequency_threshold",
                "must be at least 1",
            ));
        }

        for (i, rule) in rules.iter().enumerate() {
            if rules[..i].contains(rule) {
                return Err(AuthorizerError::invalid_config(
                    "rules",
                    format!("'{}' is listed more than once", rule),
                ));
            }
        }

        Ok(Self {
            duplicate_window: Duration::seconds(duplicate_window_secs.into()),
            frequency_window: Duration::seconds(frequency_window_secs.into()),
            frequency_threshold,
            rules,
        })
    }
}

/// Ordered, short-circuiting rule evaluator
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    config: RuleConfig,
}

impl RuleEngine {
    pub fn new(config: RuleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RuleConfig {
        &self.config
    }

    /// Evaluate the rules in order, stopping at the first that fires
    ///
    /// Evaluation is total and side-effect free: it never fails and never
    /// mutates its input, so a rejected request can be re-evaluated safely.
    pub fn evaluate(&self, input: &RuleInput<'_>) -> Decision {
        self.config
            .rules
            .iter()
            .find(|rule| rule.fires(input, &self.config))
            .map(|rule| Decision::Rejected(rule.violation()))
            .unwrap_or(Decision::Accepted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn at(minute: u32, second: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2019, 2, 13, 10, minute, second).unwrap()
    }

    fn purchase(
        merchant: &str,
        amount: i64,
        time: DateTime<Utc>,
        sequence: u64,
    ) -> RecordedTransaction {
        RecordedTransaction::purchase(&Transaction::new(merchant, amount, time), sequence)
    }

    fn evaluate(
        engine: &RuleEngine,
        account: &Account,
        history: &[RecordedTransaction],
        transaction: &Transaction,
    ) -> Decision {
        engine.evaluate(&RuleInput {
            transaction,
            history,
            account,
        })
    }

    #[test]
    fn test_accepts_when_no_rule_fires() {
        let engine = RuleEngine::default();
        let account = Account::new(1, true, 100);

        let decision = evaluate(&engine, &account, &[], &Transaction::new("A", 20, at(0, 0)));

        assert_eq!(decision, Decision::Accepted);
        assert!(decision.is_accepted());
        assert_eq!(decision.violation(), None);
    }

    #[rstest]
    #[case::inactive_card(Account::new(1, false, 100), 20, Violation::CardNotActive)]
    #[case::over_limit(Account::new(1, true, 100), 101, Violation::InsufficientLimit)]
    #[case::inactive_and_over_limit(Account::new(1, false, 100), 500, Violation::CardNotActive)]
    #[case::never_created(Account::empty(1), 1, Violation::CardNotActive)]
    fn test_account_rules(
        #[case] account: Account,
        #[case] amount: i64,
        #[case] expected: Violation,
    ) {
        let engine = RuleEngine::default();

        let decision = evaluate(&engine, &account, &[], &Transaction::new("A", amount, at(0, 0)));

        assert_eq!(decision, Decision::Rejected(expected));
    }

    #[test]
    fn test_amount_equal_to_limit_is_accepted() {
        let engine = RuleEngine::default();
        let account = Account::new(1, true, 100);

        let decision = evaluate(&engine, &account, &[], &Transaction::new("A", 100, at(0, 0)));

        assert!(decision.is_accepted());
    }

    #[rstest]
    #[case::same_merchant_and_amount("Nike", 400, Some(Violation::DuplicateTransaction))]
    #[case::different_merchant("Adidas", 400, None)]
    #[case::different_amount("Nike", 401, None)]
    fn test_duplicate_transaction(
        #[case] merchant: &str,
        #[case] amount: i64,
        #[case] expected: Option<Violation>,
    ) {
        let engine = RuleEngine::default();
        let account = Account::new(1, true, 600);
        let history = vec![purchase("Nike", 400, at(0, 0), 1)];

        let candidate = Transaction::new(merchant, amount, at(1, 0));
        let decision = evaluate(&engine, &account, &history, &candidate);

        assert_eq!(decision.violation(), expected);
    }

    #[rstest]
    #[case::exactly_on_boundary(at(2, 0), Some(Violation::DuplicateTransaction))]
    #[case::one_second_past_boundary(at(2, 1), None)]
    fn test_duplicate_window_boundary(
        #[case] time: DateTime<Utc>,
        #[case] expected: Option<Violation>,
    ) {
        let engine = RuleEngine::default();
        let account = Account::new(1, true, 1000);
        let history = vec![purchase("Nike", 400, at(0, 0), 1)];

        let decision = evaluate(&engine, &account, &history, &Transaction::new("Nike", 400, time));

        assert_eq!(decision.violation(), expected);
    }

    #[test]
    fn test_window_ignores_entries_after_candidate_time() {
        let engine = RuleEngine::default();
        let account = Account::new(1, true, 1000);
        let history = vec![purchase("Nike", 400, at(5, 0), 1)];

        let candidate = Transaction::new("Nike", 400, at(4, 0));
        let decision = evaluate(&engine, &account, &history, &candidate);

        assert!(decision.is_accepted());
    }

    #[test]
    fn test_high_frequency_fires_at_threshold() {
        let engine = RuleEngine::default();
        let account = Account::new(1, true, 1000);
        let history = vec![
            purchase("A", 10, at(0, 0), 1),
            purchase("B", 10, at(0, 30), 2),
            purchase("C", 10, at(1, 0), 3),
        ];

        let decision = evaluate(&engine, &account, &history, &Transaction::new("D", 10, at(1, 30)));

        assert_eq!(
            decision,
            Decision::Rejected(Violation::HighFrequencySmallInterval)
        );
    }

    #[test]
    fn test_high_frequency_below_threshold_is_accepted() {
        let engine = RuleEngine::default();
        let account = Account::new(1, true, 1000);
        let history = vec![
            purchase("A", 10, at(0, 0), 1),
            purchase("B", 10, at(0, 30), 2),
        ];

        let decision = evaluate(&engine, &account, &history, &Transaction::new("C", 10, at(1, 0)));

        assert!(decision.is_accepted());
    }

    #[test]
    fn test_high_frequency_after_window_elapses_is_accepted() {
        let engine = RuleEngine::default();
        let account = Account::new(1, true, 1000);
        let history = vec![
            purchase("A", 10, at(0, 0), 1),
            purchase("B", 10, at(0, 30), 2),
            purchase("C", 10, at(1, 0), 3),
        ];

        let decision = evaluate(&engine, &account, &history, &Transaction::new("D", 10, at(3, 1)));

        assert!(decision.is_accepted());
    }

    #[test]
    fn test_opening_entry_is_not_counted() {
        let config = RuleConfig::new(120, 120, 1, Rule::DEFAULT_ORDER.to_vec()).unwrap();
        let engine = RuleEngine::new(config);
        let account = Account::new(1, true, 100);
        let history = vec![RecordedTransaction::opening(100, at(0, 0))];

        let candidate = Transaction::new("initial", 100, at(0, 0));
        let decision = evaluate(&engine, &account, &history, &candidate);

        assert!(decision.is_accepted());
    }

    #[test]
    fn test_duplicate_takes_priority_over_high_frequency() {
        let engine = RuleEngine::default();
        let account = Account::new(1, true, 1000);
        let history = vec![
            purchase("A", 10, at(0, 0), 1),
            purchase("B", 10, at(0, 30), 2),
            purchase("C", 10, at(1, 0), 3),
        ];

        let decision = evaluate(&engine, &account, &history, &Transaction::new("C", 10, at(1, 30)));

        assert_eq!(decision, Decision::Rejected(Violation::DuplicateTransaction));
    }

    #[test]
    fn test_custom_order_changes_surfaced_violation() {
        let config = RuleConfig::new(
            120,
            120,
            3,
            vec![Rule::InsufficientLimit, Rule::CardNotActive],
        )
        .unwrap();
        let engine = RuleEngine::new(config);
        let account = Account::new(1, false, 100);

        let decision = evaluate(&engine, &account, &[], &Transaction::new("A", 500, at(0, 0)));

        assert_eq!(decision, Decision::Rejected(Violation::InsufficientLimit));
    }

    #[test]
    fn test_custom_threshold_and_window() {
        let config = RuleConfig::new(120, 60, 1, Rule::DEFAULT_ORDER.to_vec()).unwrap();
        let engine = RuleEngine::new(config);
        let account = Account::new(1, true, 1000);
        let history = vec![purchase("A", 10, at(0, 0), 1)];

        let inside = evaluate(&engine, &account, &history, &Transaction::new("B", 10, at(1, 0)));
        let outside = evaluate(&engine, &account, &history, &Transaction::new("B", 10, at(1, 1)));

        assert_eq!(
            inside,
            Decision::Rejected(Violation::HighFrequencySmallInterval)
        );
        assert!(outside.is_accepted());
    }

    #[test]
    fn test_empty_rule_set_accepts_everything() {
        let engine = RuleEngine::new(RuleConfig::new(120, 120, 3, vec![]).unwrap());
        let account = Account::new(1, false, 0);

        let decision = evaluate(&engine, &account, &[], &Transaction::new("A", 500, at(0, 0)));

        assert!(decision.is_accepted());
    }

    #[test]
    fn test_evaluation_does_not_mutate_input() {
        let engine = RuleEngine::default();
        let account = Account::new(1, true, 100);
        let history = vec![purchase("A", 10, at(0, 0), 1)];
        let before = (account.clone(), history.clone());

        let _ = evaluate(&engine, &account, &history, &Transaction::new("A", 10, at(0, 10)));
        let _ = evaluate(&engine, &account, &history, &Transaction::new("A", 10, at(0, 10)));

        assert_eq!((account, history), before);
    }

    #[test]
    fn test_default_config() {
        let config = RuleConfig::default();

        assert_eq!(config.duplicate_window, Duration::minutes(2));
        assert_eq!(config.frequency_window, Duration::minutes(2));
        assert_eq!(config.frequency_threshold, 3);
        assert_eq!(config.rules, Rule::DEFAULT_ORDER.to_vec());
    }

    #[rstest]
    #[case::zero_threshold(120, 120, 0, Rule::DEFAULT_ORDER.to_vec(), "frequency_threshold")]
    #[case::repeated_rule(120, 120, 3, vec![Rule::CardNotActive, Rule::CardNotActive], "rules")]
    fn test_invalid_config(
        #[case] duplicate: u32,
        #[case] frequency: u32,
        #[case] threshold: usize,
        #[case] rules: Vec<Rule>,
        #[case] field: &str,
    ) {
        let err = RuleConfig::new(duplicate, frequency, threshold, rules).unwrap_err();
        assert!(matches!(err, AuthorizerError::InvalidConfig { field: f, .. } if f == field));
    }

    #[rstest]
    #[case("card-not-active", Rule::CardNotActive)]
    #[case("insufficient-limit", Rule::InsufficientLimit)]
    #[case("duplicate-transaction", Rule::DuplicateTransaction)]
    #[case(" high-frequency-small-interval ", Rule::HighFrequencySmallInterval)]
    fn test_rule_from_str(#[case] code: &str, #[case] expected: Rule) {
        assert_eq!(code.parse::<Rule>().unwrap(), expected);
    }

    #[test]
    fn test_account_already_initialized_is_not_a_rule() {
        assert!("account-already-initialized".parse::<Rule>().is_err());
    }
}
