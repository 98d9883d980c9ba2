//! Streaming CSV tokenizer.
//!
//! A pull-based finite state machine: each `next_field` call consumes bytes
//! from the buffered source until it can return one `Field`. Field bytes are
//! passed through untouched, so any ASCII-compatible encoding (UTF-8
//! included) survives as-is.
//!
//! Row boundaries are reported one step late: the field that precedes a
//! terminator is returned first, and the `RowEnd` on the following call.

use std::fs::File;
use std::io::Read;
use std::mem;
use std::path::Path;

use csvstream_core::config::{EscapePolicy, ReaderConfig, Terminator};
use csvstream_core::field::Field;
use tracing::warn;

use crate::buf::BufferedSource;
use crate::error::{Error, Result};

/// Initial reservation for the field accumulator.
const FIELD_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    StartOfField,
    InField,
    InQuotedField,
    /// A quote was seen inside a quoted field: either the closing quote or
    /// the first half of an escaped `""`.
    InEscapedQuote,
    /// A terminator was consumed; the next call reports `RowEnd`.
    EndOfRow,
    /// Source drained and everything emitted.
    Empty,
    /// An error was returned; no further parsing.
    Failed,
}

/// Configures and builds a [`Tokenizer`]. The tokenizer itself has no
/// setters, so its dialect cannot change once parsing has started.
#[derive(Debug, Clone, Default)]
pub struct TokenizerBuilder {
    config: ReaderConfig,
}

impl TokenizerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ReaderConfig) -> Self {
        Self { config }
    }

    pub fn quote(mut self, quote: u8) -> Self {
        self.config.quote = quote;
        self
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.config.delimiter = delimiter;
        self
    }

    pub fn terminator(mut self, terminator: Terminator) -> Self {
        self.config.terminator = terminator;
        self
    }

    pub fn escape_policy(mut self, policy: EscapePolicy) -> Self {
        self.config.escape_policy = policy;
        self
    }

    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.config.buffer_capacity = capacity;
        self
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Build over any byte source. Pass `&mut reader` to keep ownership.
    pub fn from_reader<R: Read>(self, reader: R) -> Result<Tokenizer<R>> {
        self.config.validate()?;
        Ok(Tokenizer::new(self.config, reader))
    }

    /// Open `path` and build over it; the file is closed when the tokenizer
    /// is dropped.
    pub fn from_path(self, path: impl AsRef<Path>) -> Result<Tokenizer<File>> {
        self.config.validate()?;
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Tokenizer::new(self.config, file))
    }

    pub fn from_bytes(self, bytes: &[u8]) -> Result<Tokenizer<&[u8]>> {
        self.from_reader(bytes)
    }
}

pub struct Tokenizer<R> {
    source: BufferedSource<R>,
    quote: u8,
    delimiter: u8,
    terminator: Terminator,
    escape_policy: EscapePolicy,
    state: State,
    field: Vec<u8>,
    /// A delimiter was just consumed, so a (possibly empty) field is owed
    /// even if a terminator or end of input comes next.
    after_delimiter: bool,
}

impl<R: Read> Tokenizer<R> {
    fn new(config: ReaderConfig, reader: R) -> Self {
        Self {
            source: BufferedSource::with_capacity(config.buffer_capacity, reader),
            quote: config.quote,
            delimiter: config.delimiter,
            terminator: config.terminator,
            escape_policy: config.escape_policy,
            state: State::StartOfField,
            field: Vec::with_capacity(FIELD_CAPACITY),
            after_delimiter: false,
        }
    }

    /// Tokenizer with the default dialect over `reader`.
    pub fn from_reader(reader: R) -> Self {
        Self::new(ReaderConfig::default(), reader)
    }

    /// True once every field has been emitted; further calls return `StreamEnd`.
    pub fn is_exhausted(&self) -> bool {
        self.state == State::Empty
    }

    /// Input bytes consumed so far (a skipped BOM counts as consumed).
    pub fn byte_position(&self) -> u64 {
        self.source.position()
    }

    pub fn get_ref(&self) -> &R {
        self.source.get_ref()
    }

    /// Release the byte source. Dropping the tokenizer has the same effect
    /// for owned sources.
    pub fn into_inner(self) -> R {
        self.source.into_inner()
    }

    /// Read the next field or boundary signal.
    ///
    /// After any error (`Error::Malformed` or a failed read) the tokenizer is
    /// poisoned and every further call fails with `Error::InvalidUsage`.
    pub fn next_field(&mut self) -> Result<Field> {
        match self.state {
            State::Empty => return Ok(Field::StreamEnd),
            State::Failed => {
                return Err(Error::InvalidUsage(
                    "next_field called after an error was reported".into(),
                ))
            }
            _ => {}
        }
        self.field.clear();

        let res = self.advance();
        if res.is_err() {
            self.state = State::Failed;
        }
        res
    }

    fn advance(&mut self) -> Result<Field> {
        loop {
            let Some(c) = self.source.peek()? else {
                return Ok(self.finish());
            };

            match self.state {
                State::StartOfField => {
                    self.source.consume();
                    if self.terminator.matches(c) {
                        self.collapse_crlf(c)?;
                        if mem::take(&mut self.after_delimiter) {
                            self.state = State::EndOfRow;
                            return Ok(self.take_field());
                        }
                        return Ok(Field::RowEnd);
                    }
                    if c == self.quote {
                        self.after_delimiter = false;
                        self.state = State::InQuotedField;
                    } else if c == self.delimiter {
                        self.after_delimiter = true;
                        return Ok(self.take_field());
                    } else {
                        self.after_delimiter = false;
                        self.state = State::InField;
                        self.field.push(c);
                    }
                }

                State::InField => {
                    self.source.consume();
                    if self.terminator.matches(c) {
                        self.collapse_crlf(c)?;
                        self.state = State::EndOfRow;
                        return Ok(self.take_field());
                    }
                    if c == self.delimiter {
                        self.after_delimiter = true;
                        self.state = State::StartOfField;
                        return Ok(self.take_field());
                    }
                    self.field.push(c);
                }

                State::InQuotedField => {
                    self.source.consume();
                    if c == self.quote {
                        self.state = State::InEscapedQuote;
                    } else {
                        self.field.push(c);
                    }
                }

                State::InEscapedQuote => {
                    self.source.consume();
                    if self.terminator.matches(c) {
                        self.collapse_crlf(c)?;
                        self.state = State::EndOfRow;
                        return Ok(self.take_field());
                    }
                    if c == self.quote {
                        self.state = State::InQuotedField;
                        self.field.push(c);
                    } else if c == self.delimiter {
                        self.after_delimiter = true;
                        self.state = State::StartOfField;
                        return Ok(self.take_field());
                    } else {
                        match self.escape_policy {
                            EscapePolicy::Strict => {
                                return Err(Error::Malformed {
                                    position: self.source.position() - 1,
                                    byte: c,
                                });
                            }
                            EscapePolicy::Lenient => {
                                warn!(
                                    position = self.source.position() - 1,
                                    "stray byte after closing quote kept as data"
                                );
                                self.state = State::InField;
                                self.field.push(c);
                            }
                        }
                    }
                }

                // The byte that follows the terminator is left for the next call.
                State::EndOfRow => {
                    self.state = State::StartOfField;
                    return Ok(Field::RowEnd);
                }

                State::Empty | State::Failed => return Ok(Field::StreamEnd),
            }
        }
    }

    /// Source drained: emit whatever the current state still owes, then go
    /// terminal.
    ///
    /// A field still open at EOF is emitted even when empty, so `a,` ends
    /// with `""` and a lone `"` yields one empty field.
    fn finish(&mut self) -> Field {
        let state = mem::replace(&mut self.state, State::Empty);
        match state {
            State::EndOfRow => Field::RowEnd,
            State::InField | State::InQuotedField | State::InEscapedQuote => self.take_field(),
            State::StartOfField if mem::take(&mut self.after_delimiter) => self.take_field(),
            _ => Field::StreamEnd,
        }
    }

    /// Under the CRLF terminator a `\r` swallows an immediately following `\n`.
    fn collapse_crlf(&mut self, c: u8) -> Result<()> {
        if self.terminator == Terminator::Crlf && c == b'\r' && self.source.peek()? == Some(b'\n')
        {
            self.source.consume();
        }
        Ok(())
    }

    fn take_field(&mut self) -> Field {
        Field::Data(self.field.clone())
    }
}
