//! Core business logic module
//!
//! This module contains the authorization components:
//! - `traits` - The `AccountStore` abstraction
//! - `ledger` - Per-account state + history and the commit protocol
//! - `account_store` - Owned in-memory store
//! - `rules` - Ordered, short-circuiting business rules
//! - `authorizer` - Request orchestration (rules before commit)
//! - `async` - Concurrent store, service, and batch processor

pub mod account_store;
pub mod r#async;
pub mod authorizer;
pub mod ledger;
pub mod rules;
pub mod traits;

pub use account_store::InMemoryAccountStore;
pub use authorizer::Authorizer;
pub use ledger::AccountLedger;
pub use r#async::{BatchProcessor, ConcurrentAuthorizer, SharedAccountStore};
pub use rules::{Decision, Rule, RuleConfig, RuleEngine, RuleInput};
pub use traits::AccountStore;
