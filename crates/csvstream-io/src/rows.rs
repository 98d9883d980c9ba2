//! Row assembly on top of the tokenizer.
//!
//! `next_row` reuses one accumulator row across calls; callers that need a
//! row past the next call must clone it. Rows with no fields (blank lines)
//! are skipped.

use std::fs::File;
use std::io::Read;
use std::iter::FusedIterator;
use std::path::Path;

use csvstream_core::field::Field;
use csvstream_core::types::{Row, Table};
use tracing::debug;

use crate::error::Result;
use crate::tokenizer::{Tokenizer, TokenizerBuilder};

/// Expected row width before the first row tells us better.
const ROW_CAPACITY: usize = 50;

pub struct RowReader<R> {
    tokenizer: Tokenizer<R>,
    row: Row,
}

impl RowReader<File> {
    /// Default dialect over the file at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(TokenizerBuilder::new().from_path(path)?))
    }
}

impl<R: Read> RowReader<R> {
    pub fn new(tokenizer: Tokenizer<R>) -> Self {
        Self {
            tokenizer,
            row: Row::with_capacity(ROW_CAPACITY),
        }
    }

    /// Default dialect over `reader`.
    pub fn from_reader(reader: R) -> Self {
        Self::new(Tokenizer::from_reader(reader))
    }

    /// The next non-empty row, or `None` once the stream is exhausted.
    pub fn next_row(&mut self) -> Result<Option<&Row>> {
        self.row.clear();
        loop {
            match self.tokenizer.next_field()? {
                Field::Data(field) => self.row.push(field),
                Field::RowEnd => {
                    if !self.row.is_empty() {
                        return Ok(Some(&self.row));
                    }
                }
                Field::StreamEnd => {
                    return Ok(if self.row.is_empty() {
                        None
                    } else {
                        Some(&self.row)
                    });
                }
            }
        }
    }

    /// Collect every remaining row into memory.
    pub fn read_all(&mut self) -> Result<Table> {
        let mut rows = Vec::new();
        while let Some(row) = self.next_row()? {
            rows.push(row.clone());
        }
        debug!(
            rows = rows.len(),
            bytes = self.tokenizer.byte_position(),
            "read all rows"
        );
        Ok(Table::new(rows))
    }

    /// Forward-only iterator over owned rows.
    pub fn rows(&mut self) -> Rows<'_, R> {
        Rows {
            reader: self,
            done: false,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.tokenizer.is_exhausted()
    }

    pub fn byte_position(&self) -> u64 {
        self.tokenizer.byte_position()
    }

    pub fn tokenizer(&self) -> &Tokenizer<R> {
        &self.tokenizer
    }

    pub fn into_tokenizer(self) -> Tokenizer<R> {
        self.tokenizer
    }
}

/// Iterator returned by [`RowReader::rows`].
///
/// Yields `Err` at most once; after an error or the last row it only returns
/// `None`.
pub struct Rows<'r, R> {
    reader: &'r mut RowReader<R>,
    done: bool,
}

impl<R: Read> Iterator for Rows<'_, R> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.next_row() {
            Ok(Some(row)) => Some(Ok(row.clone())),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: Read> FusedIterator for Rows<'_, R> {}

impl<'r, R: Read> IntoIterator for &'r mut RowReader<R> {
    type Item = Result<Row>;
    type IntoIter = Rows<'r, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows()
    }
}
