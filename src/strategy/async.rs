//! Asynchronous batch processing strategy
//!
//! This module provides an asynchronous, multi-threaded implementation of the
//! ProcessingStrategy trait. It processes requests in batches using
//! thread-based parallelism with account-based partitioning.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, worker_threads)
//!     ├── AsyncReader (batch line reading)
//!     └── BatchProcessor (account partitioning + tasks)
//!         └── ConcurrentAuthorizer
//!             ├── SharedAccountStore (per-account locked ledgers)
//!             └── RuleEngine
//! ```
//!
//! # Ordering
//!
//! - Batches are processed sequentially, so an account's requests keep their
//!   order across the entire input
//! - Within a batch, different accounts run in parallel
//! - Responses are written back in input order once a batch completes

use crate::core::r#async::{BatchProcessor, ConcurrentAuthorizer, SharedAccountStore};
use crate::core::{RuleConfig, RuleEngine};
use crate::io::async_reader::AsyncReader;
use crate::io::json_format::write_response;
use crate::strategy::{InputSource, ProcessingStrategy};
use crate::types::AuthorizerError;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, BufReader};

/// Configuration for batch processing
///
/// Controls how requests are batched and the number of worker threads
/// for parallel processing within each batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    /// Number of requests per batch
    pub batch_size: usize,
    /// Number of runtime worker threads
    pub worker_threads: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            worker_threads: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig with custom values
    ///
    /// Zero values fall back to the defaults with a warning.
    pub fn new(batch_size: usize, worker_threads: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            tracing::warn!(
                batch_size,
                default = default.batch_size,
                "invalid batch_size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let worker_threads = if worker_threads == 0 {
            tracing::warn!(
                worker_threads,
                default = default.worker_threads,
                "invalid worker_threads, using default"
            );
            default.worker_threads
        } else {
            worker_threads
        };

        Self {
            batch_size,
            worker_threads,
        }
    }
}

/// Asynchronous batch processing strategy
///
/// Requests are read in batches and processed batch-by-batch. Within each
/// batch, requests are partitioned by account id and processed in parallel
/// across the runtime's worker threads.
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
    rules: RuleConfig,
}

impl AsyncProcessingStrategy {
    /// Create a new AsyncProcessingStrategy
    ///
    /// # Arguments
    ///
    /// * `config` - BatchConfig with batch_size and worker_threads
    /// * `rules` - Rule set every request is evaluated against
    pub fn new(config: BatchConfig, rules: RuleConfig) -> Self {
        Self { config, rules }
    }

    async fn run<R: AsyncBufRead + Unpin>(
        &self,
        mut reader: AsyncReader<R>,
        output: &mut dyn Write,
    ) -> Result<(), AuthorizerError> {
        let processor = BatchProcessor::new(ConcurrentAuthorizer::new(
            Arc::new(SharedAccountStore::new()),
            Arc::new(RuleEngine::new(self.rules.clone())),
        ));

        loop {
            let batch = reader.read_batch(self.config.batch_size).await?;
            if batch.is_empty() {
                break;
            }

            tracing::debug!(size = batch.len(), "processing batch");

            // Wait for the whole batch before reading the next one, so an
            // account spanning batches is still processed in order
            for processed in processor.process_batch(batch).await? {
                let response = processed.result?;
                write_response(&response, output)?;
            }
        }

        output.flush()?;
        Ok(())
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    /// Process requests in account-partitioned batches
    ///
    /// # Error Handling
    ///
    /// Fatal errors (file not found, I/O errors, runtime errors, storage
    /// failures) are returned immediately. Undecodable lines are logged and
    /// skipped.
    fn process(
        &self,
        source: &InputSource,
        output: &mut dyn Write,
    ) -> Result<(), AuthorizerError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.worker_threads)
            .build()
            .map_err(|e| AuthorizerError::IoError {
                message: format!("failed to create tokio runtime: {}", e),
            })?;

        runtime.block_on(async {
            match source {
                InputSource::Stdin => {
                    let reader = AsyncReader::new(BufReader::new(tokio::io::stdin()));
                    self.run(reader, output).await
                }
                InputSource::File(path) => {
                    let file = tokio::fs::File::open(path).await.map_err(|e| {
                        match e.kind() {
                            std::io::ErrorKind::NotFound => AuthorizerError::FileNotFound {
                                path: path.display().to_string(),
                            },
                            _ => AuthorizerError::from(e),
                        }
                    })?;
                    self.run(AsyncReader::new(BufReader::new(file)), output).await
                }
            }
        })
    }
}
