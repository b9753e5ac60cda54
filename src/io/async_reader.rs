//! Asynchronous line reader with batch interface
//!
//! Provides a streaming interface over decoded requests. Supports batch
//! reading for the async processing strategy.
//!
//! # Design
//!
//! The AsyncReader uses:
//! - tokio's newline `Split` over any `AsyncBufRead` (a file or stdin)
//! - the json_format module for decoding
//! - a running request index so batches can be put back in input order
//!
//! # Architecture
//!
//! ```text
//! Input → AsyncReader → Batches of IndexedRequests
//!              ↓
//!        json_format module
//!        (decode_line)
//! ```

use crate::core::r#async::IndexedRequest;
use crate::io::json_format::decode_line;
use crate::types::AuthorizerError;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Split};

/// Asynchronous request reader
///
/// Maintains streaming behavior: only one batch is held in memory.
pub struct AsyncReader<R: AsyncBufRead + Unpin> {
    lines: Split<R>,
    line_num: u64,
    next_index: usize,
}

impl<R: AsyncBufRead + Unpin> AsyncReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.split(b'\n'),
            line_num: 0,
            next_index: 0,
        }
    }

    /// Read a batch of requests
    ///
    /// Reads up to `batch_size` decoded requests. Lines that fail to decode,
    /// including lines that are not valid UTF-8, are logged and skipped; they
    /// do not consume an index.
    ///
    /// # Arguments
    ///
    /// * `batch_size` - Maximum number of requests to read
    ///
    /// # Returns
    ///
    /// Requests tagged with their position in the input stream. An empty
    /// vector means the end of the input was reached.
    ///
    /// # Errors
    ///
    /// Returns `IoError` if the underlying reader fails.
    pub async fn read_batch(
        &mut self,
        batch_size: usize,
    ) -> Result<Vec<IndexedRequest>, AuthorizerError> {
        let mut batch = Vec::with_capacity(batch_size);

        while batch.len() < batch_size {
            let Some(raw) = self.lines.next_segment().await? else {
                break;
            };
            self.line_num += 1;

            match decode_line(&raw, self.line_num) {
                Ok(None) => {}
                Ok(Some(request)) => {
                    batch.push((self.next_index, request));
                    self.next_index += 1;
                }
                Err(e) => tracing::warn!(error = %e, "skipping input line"),
            }
        }

        Ok(batch)
    }
}
