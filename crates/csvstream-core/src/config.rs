//! Reader dialect configuration.
//!
//! `ReaderConfig` is immutable once a tokenizer has been built from it. It is
//! plain serde data so the CLI can load it from YAML; single bytes are written
//! as one-character ASCII strings and the terminator as `"crlf"` or a single
//! character.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default read-buffer capacity (128 KiB).
pub const DEFAULT_BUFFER_CAPACITY: usize = 128 * 1024;

/// Smallest buffer that still sees a whole UTF-8 BOM on the first fill.
pub const MIN_BUFFER_CAPACITY: usize = 4;

/// Row terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Terminator {
    /// Accept `\r`, `\n`, or `\r\n` interchangeably.
    #[default]
    Crlf,
    /// Only this exact byte ends a row; `\r` and `\n` are ordinary data.
    Byte(u8),
}

impl Terminator {
    #[inline]
    pub fn matches(self, c: u8) -> bool {
        match self {
            Terminator::Crlf => c == b'\r' || c == b'\n',
            Terminator::Byte(b) => b == c,
        }
    }
}

impl FromStr for Terminator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("crlf") || s == "\r\n" || s == "\\r\\n" {
            return Ok(Terminator::Crlf);
        }
        parse_ascii_byte(s).map(Terminator::Byte)
    }
}

impl TryFrom<String> for Terminator {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Terminator> for String {
    fn from(t: Terminator) -> Self {
        match t {
            Terminator::Crlf => "crlf".to_string(),
            Terminator::Byte(b) => (b as char).to_string(),
        }
    }
}

impl fmt::Display for Terminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Terminator::Crlf => f.write_str("crlf"),
            Terminator::Byte(b) => write!(f, "{:?}", *b as char),
        }
    }
}

/// What to do with a byte that follows a closing quote but is neither a
/// delimiter, a terminator, nor another quote (`"ab"c`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EscapePolicy {
    /// Fail with a malformed-input error.
    #[default]
    Strict,
    /// Keep the byte and continue as an unquoted field.
    Lenient,
}

impl FromStr for EscapePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(EscapePolicy::Strict),
            "lenient" => Ok(EscapePolicy::Lenient),
            other => Err(Error::Config(format!(
                "unknown escape policy '{other}' (expected 'strict' or 'lenient')"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReaderConfig {
    #[serde(with = "ascii_byte")]
    pub quote: u8,
    #[serde(with = "ascii_byte")]
    pub delimiter: u8,
    pub terminator: Terminator,
    pub escape_policy: EscapePolicy,
    /// Capacity of the tokenizer's read buffer in bytes.
    pub buffer_capacity: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            quote: b'"',
            delimiter: b',',
            terminator: Terminator::Crlf,
            escape_policy: EscapePolicy::Strict,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }
}

impl ReaderConfig {
    /// Defaults overlaid with `CSVSTREAM_*` environment variables.
    ///
    /// Unparsable values are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ReaderConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();
        if let Some(b) = lookup("CSVSTREAM_QUOTE").and_then(|v| parse_ascii_byte(&v).ok()) {
            cfg.quote = b;
        }
        if let Some(b) = lookup("CSVSTREAM_DELIMITER").and_then(|v| parse_ascii_byte(&v).ok()) {
            cfg.delimiter = b;
        }
        if let Some(t) = lookup("CSVSTREAM_TERMINATOR").and_then(|v| v.parse().ok()) {
            cfg.terminator = t;
        }
        if let Some(p) = lookup("CSVSTREAM_ESCAPE").and_then(|v| v.parse().ok()) {
            cfg.escape_policy = p;
        }
        if let Some(n) = lookup("CSVSTREAM_BUFFER_BYTES").and_then(|v| v.trim().parse().ok()) {
            cfg.buffer_capacity = n;
        }
        cfg
    }

    /// Reject dialects whose special bytes collide, and undersized buffers.
    pub fn validate(&self) -> Result<()> {
        if self.quote == self.delimiter {
            return Err(Error::Config(format!(
                "quote and delimiter collide (both {:?})",
                self.quote as char
            )));
        }
        match self.terminator {
            Terminator::Byte(t) if t == self.quote || t == self.delimiter => {
                return Err(Error::Config(format!(
                    "terminator {:?} collides with the quote or delimiter",
                    t as char
                )));
            }
            Terminator::Crlf => {
                for (name, b) in [("quote", self.quote), ("delimiter", self.delimiter)] {
                    if Terminator::Crlf.matches(b) {
                        return Err(Error::Config(format!(
                            "{name} {:?} collides with the CRLF terminator",
                            b as char
                        )));
                    }
                }
            }
            Terminator::Byte(_) => {}
        }
        if self.buffer_capacity < MIN_BUFFER_CAPACITY {
            return Err(Error::Config(format!(
                "buffer capacity {} is below the minimum of {MIN_BUFFER_CAPACITY} bytes",
                self.buffer_capacity
            )));
        }
        Ok(())
    }

    pub fn with_quote(mut self, quote: u8) -> Self {
        self.quote = quote;
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_terminator(mut self, terminator: Terminator) -> Self {
        self.terminator = terminator;
        self
    }

    pub fn with_escape_policy(mut self, policy: EscapePolicy) -> Self {
        self.escape_policy = policy;
        self
    }

    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }
}

/// Parse a one-character ASCII string, or one of the escapes `\t`, `\n`, `\r`
/// (also `tab`), into a byte.
pub fn parse_ascii_byte(s: &str) -> Result<u8> {
    match s {
        "\\t" | "tab" => return Ok(b'\t'),
        "\\n" => return Ok(b'\n'),
        "\\r" => return Ok(b'\r'),
        _ => {}
    }
    match s.as_bytes() {
        [b] if b.is_ascii() => Ok(*b),
        _ => Err(Error::Config(format!(
            "expected a single ASCII character, got {s:?}"
        ))),
    }
}

mod ascii_byte {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(b: &u8, s: S) -> Result<S::Ok, S::Error> {
        let mut buf = [0u8; 4];
        s.serialize_str((*b as char).encode_utf8(&mut buf))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<u8, D::Error> {
        let s = String::deserialize(d)?;
        super::parse_ascii_byte(&s).map_err(de::Error::custom)
    }
}
