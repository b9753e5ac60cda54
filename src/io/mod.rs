//! I/O module
//!
//! Handles JSON line decoding and response output.
//!
//! # Components
//!
//! - `json_format` - Wire format handling (line decoding, response serialization)
//! - `sync_reader` - Synchronous reader with iterator interface
//! - `async_reader` - Asynchronous reader with batch reading interface

pub mod async_reader;
pub mod json_format;
pub mod sync_reader;

pub use async_reader::AsyncReader;
pub use json_format::{convert_input_line, parse_request, write_response, InputLine};
pub use sync_reader::SyncReader;
