#![forbid(unsafe_code)]
//! csvstream: a streaming CSV tokenizer.
//!
//! Facade over the workspace crates:
//! - `csvstream_core`: `Field`, `Row`, `Table`, `ReaderConfig`.
//! - `csvstream_io`: `Tokenizer`, `RowReader`.
//! - `csvstream_infer`: column-type inference over a `Table`.
//!
//! ```rust
//! use csvstream::RowReader;
//!
//! let mut reader = RowReader::from_reader(&b"a,b\n\"c,d\",e\n"[..]);
//! let table = reader.read_all().unwrap();
//! assert_eq!(table.to_strings(), vec![vec!["a", "b"], vec!["c,d", "e"]]);
//! ```

pub use csvstream_infer as infer;

pub use csvstream_core::prelude::*;
pub use csvstream_io::Error as ReadError;
pub use csvstream_io::{RowReader, Rows, Tokenizer, TokenizerBuilder};
