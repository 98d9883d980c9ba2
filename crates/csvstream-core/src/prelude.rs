//! Convenience re-exports for downstream crates.

pub use crate::config::{EscapePolicy, ReaderConfig, Terminator, DEFAULT_BUFFER_CAPACITY};
pub use crate::error::{Error, Result};
pub use crate::field::Field;
pub use crate::types::{Row, Table};
