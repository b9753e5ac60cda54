//! Card Authorizer CLI
//!
//! Command-line interface for authorizing card transactions read as JSON lines.
//!
//! # Usage
//!
//! ```bash
//! cargo run < operations.jsonl > responses.jsonl
//! cargo run -- operations.jsonl > responses.jsonl
//! cargo run -- --strategy async --batch-size 2000 --worker-threads 8 operations.jsonl
//! cargo run -- --rules card-not-active,insufficient-limit --frequency-threshold 5 operations.jsonl
//! ```
//!
//! The program reads operations from the input file (or stdin), authorizes
//! them using the selected processing strategy, and writes one JSON response
//! per operation to stdout. Logs go to stderr, or to `--log-file`.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (invalid configuration, file not found, I/O or storage failure)

use card_authorizer::{cli, logging, strategy};
use std::process;

fn main() {
    let args = cli::parse_args();

    if let Err(e) = logging::init(args.log_file.as_deref()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    let rules = match args.to_rule_config() {
        Ok(rules) => rules,
        Err(e) => {
            tracing::error!(error = %e, "invalid rule configuration");
            process::exit(1);
        }
    };

    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy, config, rules)
    };

    let mut output = std::io::stdout().lock();
    if let Err(e) = strategy.process(&args.input_source(), &mut output) {
        tracing::error!(error = %e, "processing failed");
        process::exit(1);
    }
}
