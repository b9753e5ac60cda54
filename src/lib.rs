//! Card Authorizer Library
//! # Overview
//!
//! This library authorizes card transactions against per-account business
//! rules. Requests arrive as JSON lines, and every decoded request produces
//! exactly one response carrying the resulting account state and the
//! violations that were found (empty on acceptance). Both a sync and an
//! async strategy are provided.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (Account, Transaction, Violation, etc.)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::account_store`] - Account state and committed history
//!   - [`core::rules`] - Ordered, short-circuiting business rules
//!   - [`core::authorizer`] - Request orchestration (rules before commit)
//! - [`io`] - JSON line decoding and response output
//! - [`strategy`] - Sync and async processing pipelines
//! - [`logging`] - Tracing subscriber setup
//!
//! # Rules
//!
//! Evaluated in this order; the first one that fires is reported:
//!
//! - **card-not-active**: The account's card is inactive
//! - **insufficient-limit**: The amount exceeds the available limit
//! - **duplicate-transaction**: Same merchant and amount within the duplicate window
//! - **high-frequency-small-interval**: Too many purchases within the frequency window
//!
//! Accepted transactions debit the available limit and are appended to the
//! account's history. Rejected transactions change nothing.

pub mod cli;
pub mod core;
pub mod io;
pub mod logging;
pub mod strategy;
pub mod types;

pub use core::{AccountStore, Authorizer, InMemoryAccountStore, RuleConfig, RuleEngine};
pub use io::write_response;
pub use types::{
    Account, AccountId, Amount, AuthorizationResponse, AuthorizerError, Request, Transaction,
    Violation,
};
