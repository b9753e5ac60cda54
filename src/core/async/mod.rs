//! Concurrent implementations of the core components
//!
//! This module provides thread-safe counterparts of the store and service,
//! built on DashMap, plus the batch processor the async strategy drives.
//!
//! - **SharedAccountStore**: per-account locked ledgers
//! - **ConcurrentAuthorizer**: read-evaluate-commit under the account lock
//! - **BatchProcessor**: one tokio task per account within a batch
//!
//! # Thread Safety
//!
//! - Operations on different accounts proceed in parallel
//! - Operations on the same account are serialized by its map entry
//! - No global locks

pub mod authorizer;
pub mod batch_processor;
pub mod shared_store;

pub use authorizer::ConcurrentAuthorizer;
pub use batch_processor::{BatchProcessor, IndexedRequest, ProcessingResult};
pub use shared_store::SharedAccountStore;
