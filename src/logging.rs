//! Logging setup
//!
//! Events go to stderr by default, or to a file when one is configured, so
//! stdout only ever carries responses. The level comes from `RUST_LOG` and
//! defaults to `info`.

use crate::types::AuthorizerError;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "info";

/// Install the global tracing subscriber
///
/// # Arguments
///
/// * `log_file` - Append logs to this file instead of stderr
///
/// # Errors
///
/// Returns `IoError` if the log file cannot be opened, and
/// `InvalidConfig` if a global subscriber is already installed.
pub fn init(log_file: Option<&Path>) -> Result<(), AuthorizerError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false),
            )
        }
        None => None,
    };

    let stderr_layer = log_file
        .is_none()
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| AuthorizerError::invalid_config("log", e.to_string()))
}
