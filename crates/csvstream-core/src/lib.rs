#![forbid(unsafe_code)]
//! csvstream-core: shared kernel for the csvstream tokenizer.
//!
//! This crate contains only *pure* types and small helpers that the other
//! crates build on. There is **no I/O** here.
//!
//! Crates that use this:
//! - csvstream-io: drives the tokenizer state machine and emits `Field`s / `Row`s.
//! - csvstream-infer: classifies the cells of a materialized `Table`.
//! - csvstream-cli: loads `ReaderConfig` from flags, YAML, and the environment.

pub mod config;
pub mod error;
pub mod field;
pub mod prelude;
pub mod types;

pub use error::{Error, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
