//! Batch processing with account-based partitioning
//!
//! This module provides the `BatchProcessor` struct, which runs a batch of
//! decoded requests through the `ConcurrentAuthorizer` with one tokio task
//! per account. Requests for different accounts run in parallel; requests
//! for the same account run sequentially in input order.
//!
//! # Architecture
//!
//! ```text
//! BatchProcessor
//!     └── ConcurrentAuthorizer (shared, per-account locked)
//! ```

use std::collections::HashMap;

use super::ConcurrentAuthorizer;
use crate::types::{AccountId, AuthorizationResponse, AuthorizerError, Request};

/// A request tagged with its position in the input stream
pub type IndexedRequest = (usize, Request);

/// Result of processing a single request
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// Position of the request in the input stream
    pub index: usize,

    /// The response, or the storage error that prevented one
    pub result: Result<AuthorizationResponse, AuthorizerError>,
}

#[derive(Debug, Clone)]
pub struct BatchProcessor {
    authorizer: ConcurrentAuthorizer,
}

impl BatchProcessor {
    pub fn new(authorizer: ConcurrentAuthorizer) -> Self {
        Self { authorizer }
    }

    /// Partition a batch of requests by account ID
    ///
    /// # Guarantees
    ///
    /// - Each request appears in exactly one partition
    /// - Requests for each account keep their original order
    pub fn partition_by_account(
        &self,
        batch: Vec<IndexedRequest>,
    ) -> HashMap<AccountId, Vec<IndexedRequest>> {
        let mut account_batches: HashMap<AccountId, Vec<IndexedRequest>> = HashMap::new();

        for (index, request) in batch {
            account_batches
                .entry(request.account_id())
                .or_default()
                .push((index, request));
        }

        account_batches
    }

    /// Process all requests for a single account sequentially
    ///
    /// Every request is processed even if an earlier one failed; results
    /// keep the input order.
    pub fn process_account_requests(&self, requests: Vec<IndexedRequest>) -> Vec<ProcessingResult> {
        requests
            .into_iter()
            .map(|(index, request)| ProcessingResult {
                index,
                result: self.authorizer.handle(request),
            })
            .collect()
    }

    /// Process a batch with one task per account
    ///
    /// # Returns
    ///
    /// Results for every request, sorted back into input order.
    ///
    /// # Errors
    ///
    /// Returns `TaskFailed` if a worker task panicked.
    pub async fn process_batch(
        &self,
        batch: Vec<IndexedRequest>,
    ) -> Result<Vec<ProcessingResult>, AuthorizerError> {
        let account_batches = self.partition_by_account(batch);

        let tasks = account_batches.into_values().map(|requests| {
            let processor = self.clone();
            tokio::spawn(async move { processor.process_account_requests(requests) })
        });

        let mut results = Vec::new();
        for joined in futures::future::join_all(tasks).await {
            let account_results = joined.map_err(|e| AuthorizerError::TaskFailed {
                message: e.to_string(),
            })?;
            results.extend(account_results);
        }

        results.sort_by_key(|r| r.index);
        Ok(results)
    }
}
