//! Synchronous processing strategy
//!
//! This module provides a synchronous, single-threaded implementation of the
//! ProcessingStrategy trait. It orchestrates processing by coordinating
//! between the SyncReader (for line input) and the Authorizer (for business
//! logic).
//!
//! # Design
//!
//! The SyncProcessingStrategy focuses on orchestration, delegating:
//! - Line decoding to `SyncReader` (iterator interface)
//! - Authorization to `Authorizer` over an owned `InMemoryAccountStore`
//! - Output to `json_format::write_response`
//!
//! Each response is written as soon as its request has been handled.

use crate::core::{Authorizer, InMemoryAccountStore, RuleConfig, RuleEngine};
use crate::io::json_format::write_response;
use crate::io::sync_reader::SyncReader;
use crate::strategy::{InputSource, ProcessingStrategy};
use crate::types::AuthorizerError;
use std::io::{BufRead, Write};

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use card_authorizer::core::RuleConfig;
/// use card_authorizer::strategy::{InputSource, ProcessingStrategy, SyncProcessingStrategy};
/// use std::io;
///
/// let strategy = SyncProcessingStrategy::new(RuleConfig::default());
/// let mut output = io::stdout();
///
/// strategy.process(&InputSource::Stdin, &mut output)
///     .expect("Processing failed");
/// ```
#[derive(Debug, Clone, Default)]
pub struct SyncProcessingStrategy {
    rules: RuleConfig,
}

impl SyncProcessingStrategy {
    pub fn new(rules: RuleConfig) -> Self {
        Self { rules }
    }

    fn run<R: BufRead>(
        &self,
        reader: SyncReader<R>,
        output: &mut dyn Write,
    ) -> Result<(), AuthorizerError> {
        let mut authorizer = Authorizer::new(
            InMemoryAccountStore::new(),
            RuleEngine::new(self.rules.clone()),
        );

        for result in reader {
            match result {
                Ok(request) => {
                    let response = authorizer.handle(request)?;
                    write_response(&response, output)?;
                }
                Err(e) if e.is_recoverable() => {
                    tracing::warn!(error = %e, "skipping input line");
                }
                Err(e) => return Err(e),
            }
        }

        output.flush()?;
        Ok(())
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    /// Process requests one at a time
    ///
    /// # Error Handling
    ///
    /// Fatal errors (file not found, I/O errors, storage failures) are
    /// returned immediately. Undecodable lines are logged and skipped.
    fn process(
        &self,
        source: &InputSource,
        output: &mut dyn Write,
    ) -> Result<(), AuthorizerError> {
        match source {
            InputSource::Stdin => self.run(SyncReader::new(std::io::stdin().lock()), output),
            InputSource::File(path) => self.run(SyncReader::open(path)?, output),
        }
    }
}
