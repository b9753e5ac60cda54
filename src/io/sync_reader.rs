//! Synchronous line reader with iterator interface
//!
//! Provides a streaming iterator over decoded requests from any buffered
//! reader (a file or stdin). Delegates format concerns to the json_format
//! module.
//!
//! # Iterator Interface
//!
//! SyncReader implements the Iterator trait, yielding
//! `Result<Request, AuthorizerError>` for each non-blank line:
//!
//! ```no_run
//! use card_authorizer::io::sync_reader::SyncReader;
//! use std::path::Path;
//!
//! let reader = SyncReader::open(Path::new("operations.jsonl")).unwrap();
//! for result in reader {
//!     match result {
//!         Ok(request) => println!("Processing request: {:?}", request),
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! # Error Handling
//!
//! - A missing file is reported by `open()` as `FileNotFound`
//! - Decoding errors (including invalid UTF-8) are yielded per line, tagged
//!   with the line number
//! - A read failure is yielded as `IoError`; iteration stops after it

use crate::io::json_format::decode_line;
use crate::types::{AuthorizerError, Request};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

#[derive(Debug)]
pub struct SyncReader<R: BufRead> {
    reader: R,
    line_num: u64,
    buffer: Vec<u8>,
    failed: bool,
}

impl SyncReader<BufReader<File>> {
    /// Open a file for streaming iteration
    ///
    /// # Errors
    ///
    /// Returns `FileNotFound` if the file does not exist, `IoError` for any
    /// other open failure.
    pub fn open(path: &Path) -> Result<Self, AuthorizerError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AuthorizerError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => AuthorizerError::from(e),
        })?;

        Ok(Self::new(BufReader::with_capacity(8 * 1024, file)))
    }
}

impl<R: BufRead> SyncReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_num: 0,
            buffer: Vec::new(),
            failed: false,
        }
    }
}

impl<R: BufRead> Iterator for SyncReader<R> {
    type Item = Result<Request, AuthorizerError>;

    /// Decode the next non-blank line
    ///
    /// # Returns
    ///
    /// * `Some(Ok(Request))` - Successfully decoded request
    /// * `Some(Err(AuthorizerError))` - Decoding or read error
    /// * `None` - End of input reached
    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            self.buffer.clear();
            match self.reader.read_until(b'\n', &mut self.buffer) {
                Ok(0) => return None,
                Ok(_) => {
                    self.line_num += 1;
                    // Blank lines decode to None and are skipped
                    if let Some(result) = decode_line(&self.buffer, self.line_num).transpose() {
                        return Some(result);
                    }
                }
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e.into()));
                }
            }
        }
    }
}
