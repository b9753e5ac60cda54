use crate::core::rules::{
    DEFAULT_DUPLICATE_WINDOW_SECS, DEFAULT_FREQUENCY_THRESHOLD, DEFAULT_FREQUENCY_WINDOW_SECS,
};
use crate::core::{Rule, RuleConfig};
use crate::strategy::{BatchConfig, InputSource};
use crate::types::AuthorizerError;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Authorize card transactions against per-account business rules
#[derive(Parser, Debug)]
#[command(name = "card-authorizer", version)]
#[command(about = "Authorize card transactions read as JSON lines", long_about = None)]
pub struct CliArgs {
    /// Input file of JSON operations, one per line
    #[arg(value_name = "INPUT", help = "Path to the input file (reads stdin when omitted)")]
    pub input_file: Option<PathBuf>,

    /// Processing strategy
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "sync",
        help = "Processing strategy: 'sync' for sequential or 'async' for account-partitioned batches"
    )]
    pub strategy: StrategyType,

    /// Number of requests per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of requests per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Number of worker threads (async mode only)
    #[arg(
        long = "worker-threads",
        value_name = "COUNT",
        help = "Number of worker threads (default: CPU cores)"
    )]
    pub worker_threads: Option<usize>,

    /// Window for the duplicate-transaction rule
    #[arg(
        long = "duplicate-window-secs",
        value_name = "SECS",
        env = "AUTHORIZER_DUPLICATE_WINDOW_SECS",
        default_value_t = DEFAULT_DUPLICATE_WINDOW_SECS
    )]
    pub duplicate_window_secs: u32,

    /// Window for the high-frequency-small-interval rule
    #[arg(
        long = "frequency-window-secs",
        value_name = "SECS",
        env = "AUTHORIZER_FREQUENCY_WINDOW_SECS",
        default_value_t = DEFAULT_FREQUENCY_WINDOW_SECS
    )]
    pub frequency_window_secs: u32,

    /// Committed purchases inside the window that trigger high-frequency-small-interval
    #[arg(
        long = "frequency-threshold",
        value_name = "COUNT",
        env = "AUTHORIZER_FREQUENCY_THRESHOLD",
        default_value_t = DEFAULT_FREQUENCY_THRESHOLD
    )]
    pub frequency_threshold: usize,

    /// Rules to evaluate, in priority order
    #[arg(
        long = "rules",
        value_name = "RULES",
        env = "AUTHORIZER_RULES",
        value_delimiter = ',',
        help = "Comma-separated violation codes to check, in order (default: all)"
    )]
    pub rules: Option<Vec<Rule>>,

    /// Write logs to this file instead of stderr
    #[arg(long = "log-file", value_name = "PATH", env = "AUTHORIZER_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

/// Available processing strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl CliArgs {
    pub fn input_source(&self) -> InputSource {
        InputSource::from(self.input_file.clone())
    }

    /// Create a BatchConfig from CLI arguments
    ///
    /// Uses the provided values where given and the defaults otherwise.
    /// Zero values fall back to the defaults with a warning.
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.worker_threads.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.worker_threads.unwrap_or(default.worker_threads),
            )
        } else {
            BatchConfig::default()
        }
    }

    /// Create a validated RuleConfig from CLI arguments
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for a zero threshold or a repeated rule.
    pub fn to_rule_config(&self) -> Result<RuleConfig, AuthorizerError> {
        RuleConfig::new(
            self.duplicate_window_secs,
            self.frequency_window_secs,
            self.frequency_threshold,
            self.rules
                .clone()
                .unwrap_or_else(|| Rule::DEFAULT_ORDER.to_vec()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rstest::rstest;

    #[rstest]
    #[case::default_strategy(&["program", "input.jsonl"], StrategyType::Sync)]
    #[case::explicit_sync(&["program", "--strategy", "sync", "input.jsonl"], StrategyType::Sync)]
    #[case::explicit_async(&["program", "--strategy", "async", "input.jsonl"], StrategyType::Async)]
    fn test_strategy_parsing(#[case] args: &[&str], #[case] expected: StrategyType) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.strategy, expected);
    }

    #[rstest]
    #[case::stdin(&["program"], InputSource::Stdin)]
    #[case::file(&["program", "ops.jsonl"], InputSource::File(PathBuf::from("ops.jsonl")))]
    fn test_input_source(#[case] args: &[&str], #[case] expected: InputSource) {
        let parsed = CliArgs::try_parse_from(args).unwrap();
        assert_eq!(parsed.input_source(), expected);
    }

    #[rstest]
    #[case::all_defaults(&["program"], 1000, num_cpus::get())]
    #[case::custom_batch_size(&["program", "--batch-size", "2000"], 2000, num_cpus::get())]
    #[case::custom_worker_threads(&["program", "--worker-threads", "8"], 1000, 8)]
    #[case::zero_batch_size(&["program", "--batch-size", "0"], 1000, num_cpus::get())]
    #[case::zero_worker_threads(&["program", "--worker-threads", "0"], 1000, num_cpus::get())]
    fn test_batch_config_conversion(
        #[case] args: &[&str],
        #[case] expected_batch_size: usize,
        #[case] expected_worker_threads: usize,
    ) {
        let config = CliArgs::try_parse_from(args).unwrap().to_batch_config();

        assert_eq!(config.batch_size, expected_batch_size);
        assert_eq!(config.worker_threads, expected_worker_threads);
    }

    #[test]
    fn test_rule_config_defaults() {
        let config = CliArgs::try_parse_from(["program"])
            .unwrap()
            .to_rule_config()
            .unwrap();

        assert_eq!(config, RuleConfig::default());
    }

    #[test]
    fn test_rule_config_custom_values() {
        let config = CliArgs::try_parse_from([
            "program",
            "--duplicate-window-secs",
            "60",
            "--frequency-window-secs",
            "300",
            "--frequency-threshold",
            "5",
            "--rules",
            "insufficient-limit,card-not-active",
        ])
        .unwrap()
        .to_rule_config()
        .unwrap();

        assert_eq!(config.duplicate_window, Duration::seconds(60));
        assert_eq!(config.frequency_window, Duration::seconds(300));
        assert_eq!(config.frequency_threshold, 5);
        assert_eq!(config.rules, vec![Rule::InsufficientLimit, Rule::CardNotActive]);
    }

    #[rstest]
    #[case::zero_threshold(&["program", "--frequency-threshold", "0"])]
    #[case::repeated_rule(&["program", "--rules", "card-not-active,card-not-active"])]
    fn test_invalid_rule_config(#[case] args: &[&str]) {
        let err = CliArgs::try_parse_from(args)
            .unwrap()
            .to_rule_config()
            .unwrap_err();

        assert!(matches!(err, AuthorizerError::InvalidConfig { .. }));
    }

    #[rstest]
    #[case::invalid_strategy(&["program", "--strategy", "invalid"])]
    #[case::unknown_rule(&["program", "--rules", "card-not-active,no-such-rule"])]
    #[case::negative_window(&["program", "--duplicate-window-secs", "-1"])]
    #[case::extra_positional(&["program", "a.jsonl", "b.jsonl"])]
    fn test_parsing_errors(#[case] args: &[&str]) {
        assert!(CliArgs::try_parse_from(args).is_err());
    }
}
