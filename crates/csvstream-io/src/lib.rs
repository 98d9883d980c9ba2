#![forbid(unsafe_code)]
//! csvstream-io: the streaming half of csvstream.
//!
//! - `buf`: fixed-capacity buffered byte source with one-byte peek/consume.
//! - `tokenizer`: the field-level state machine (`Tokenizer::next_field`).
//! - `rows`: groups fields into rows (`RowReader::next_row`, `read_all`, `rows`).
//!
//! Memory use is bounded by the read buffer plus the longest field, never by
//! the size of the input.

pub mod buf;
pub mod error;
pub mod rows;
pub mod tokenizer;

pub use error::{Error, Result};
pub use rows::{RowReader, Rows};
pub use tokenizer::{Tokenizer, TokenizerBuilder};
