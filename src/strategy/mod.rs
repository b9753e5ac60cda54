//! Processing strategy module for request processing
//!
//! This module defines the Strategy pattern for complete processing pipelines,
//! encompassing both line decoding and authorization. This allows different
//! processing implementations (synchronous, asynchronous batch) to be selected
//! at runtime.

use crate::cli::StrategyType;
use crate::core::RuleConfig;
use crate::types::AuthorizerError;
use std::io::Write;
use std::path::PathBuf;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Where requests are read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl From<Option<PathBuf>> for InputSource {
    fn from(path: Option<PathBuf>) -> Self {
        path.map_or(InputSource::Stdin, InputSource::File)
    }
}

/// Processing strategy trait for complete authorization pipelines
///
/// Each strategy reads requests from an input source, authorizes them against
/// its own fresh account store, and writes one response line per decoded
/// request, in input order.
pub trait ProcessingStrategy: Send + Sync {
    /// Process requests from the input and write responses to output
    ///
    /// # Arguments
    ///
    /// * `source` - Stdin or a path to a file of JSON lines
    /// * `output` - Writer receiving one JSON response per request
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input file cannot be opened
    /// - A fatal I/O error occurs during reading or writing
    /// - The account store fails while committing
    ///
    /// Lines that fail to decode are logged and skipped; they produce no
    /// response and do not cause this method to return an error.
    fn process(&self, source: &InputSource, output: &mut dyn Write)
        -> Result<(), AuthorizerError>;
}

/// Create a processing strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - The type of processing strategy to create (Sync or Async)
/// * `batch_config` - Optional configuration for async batch processing (ignored for sync)
/// * `rules` - Rule set every request is evaluated against
///
/// # Returns
///
/// A boxed trait object implementing the ProcessingStrategy trait
pub fn create_strategy(
    strategy_type: StrategyType,
    batch_config: Option<BatchConfig>,
    rules: RuleConfig,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(rules)),
        StrategyType::Async => Box::new(AsyncProcessingStrategy::new(
            batch_config.unwrap_or_default(),
            rules,
        )),
    }
}
