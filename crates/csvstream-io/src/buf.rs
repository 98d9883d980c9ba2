//! Bounded buffered byte source.
//!
//! Wraps any `Read` with a fixed-capacity buffer that is refilled in bulk
//! whenever the cursor catches up with the filled length. `peek`/`consume`
//! are amortized O(1). A UTF-8 byte-order mark at the very start of the
//! stream is skipped during the first fill.

use std::io::{self, ErrorKind, Read};
use std::mem;

use tracing::{debug, trace};

pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

pub struct BufferedSource<R> {
    inner: R,
    buf: Box<[u8]>,
    /// Number of valid bytes in `buf`.
    filled: usize,
    /// Next unread byte in `buf`.
    cursor: usize,
    eof: bool,
    /// Bytes held by buffers that have already been fully consumed.
    scanned: u64,
    first_fill: bool,
}

impl<R: Read> BufferedSource<R> {
    pub fn with_capacity(capacity: usize, inner: R) -> Self {
        Self {
            inner,
            buf: vec![0u8; capacity.max(1)].into_boxed_slice(),
            filled: 0,
            cursor: 0,
            eof: false,
            scanned: 0,
            first_fill: true,
        }
    }

    /// Next byte without consuming it; `None` once the source is drained.
    #[inline]
    pub fn peek(&mut self) -> io::Result<Option<u8>> {
        if self.cursor == self.filled {
            if self.eof {
                return Ok(None);
            }
            self.fill()?;
            if self.cursor == self.filled {
                return Ok(None);
            }
        }
        Ok(Some(self.buf[self.cursor]))
    }

    /// Advance past the byte returned by the last successful `peek`.
    #[inline]
    pub fn consume(&mut self) {
        debug_assert!(self.cursor < self.filled, "consume without a peeked byte");
        if self.cursor < self.filled {
            self.cursor += 1;
        }
    }

    /// Peek and consume in one step.
    #[inline]
    pub fn next_byte(&mut self) -> io::Result<Option<u8>> {
        let b = self.peek()?;
        if b.is_some() {
            self.cursor += 1;
        }
        Ok(b)
    }

    /// Bytes consumed so far, including a skipped BOM.
    pub fn position(&self) -> u64 {
        self.scanned + self.cursor as u64
    }

    /// True once the source reported end-of-stream and the buffer is drained.
    pub fn is_drained(&self) -> bool {
        self.eof && self.cursor == self.filled
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Replace the buffer contents with the next chunk of the source.
    ///
    /// Reads until the buffer is full or the source returns 0; a short chunk
    /// marks end-of-stream. A failed read keeps the bytes that arrived before
    /// it, and the first fill is over whether or not it succeeded.
    fn fill(&mut self) -> io::Result<()> {
        self.scanned += self.filled as u64;
        self.filled = 0;
        self.cursor = 0;

        let mut result = Ok(());
        while self.filled < self.buf.len() {
            match self.inner.read(&mut self.buf[self.filled..]) {
                Ok(0) => break,
                Ok(n) => self.filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    result = Err(e);
                    break;
                }
            }
        }
        if result.is_ok() && self.filled < self.buf.len() {
            self.eof = true;
            debug!(position = self.scanned + self.filled as u64, "byte source exhausted");
        }
        trace!(bytes = self.filled, scanned = self.scanned, "refilled read buffer");

        if mem::take(&mut self.first_fill) && self.buf[..self.filled].starts_with(&UTF8_BOM) {
            debug!("skipping UTF-8 byte-order mark");
            self.cursor = UTF8_BOM.len();
        }
        result
    }
}
