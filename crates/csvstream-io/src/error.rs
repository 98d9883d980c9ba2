use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("source unavailable: {}: {source}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed input at byte {position}: unexpected {:?} after closing quote", *byte as char)]
    Malformed { position: u64, byte: u8 },

    #[error("invalid usage: {0}")]
    InvalidUsage(String),

    #[error(transparent)]
    Core(#[from] csvstream_core::Error),

    #[error("Error in {context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub fn is_malformed(&self) -> bool {
        match self {
            Error::Malformed { .. } => true,
            Error::Context { source, .. } => source.is_malformed(),
            _ => false,
        }
    }

    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Error::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get suggestions for common errors.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Error::SourceUnavailable { .. } => vec![
                "Check that the path exists and is readable".into(),
                "Use '-' to read from standard input".into(),
            ],
            Error::Malformed { .. } => vec![
                "A quoted field must be followed by a delimiter, terminator, or end of input".into(),
                "Double a quote inside a quoted field to escape it".into(),
                "Enable the lenient escape policy to keep stray bytes as data".into(),
            ],
            Error::InvalidUsage(_) => {
                vec!["Discard the tokenizer after it reports an error".into()]
            }
            Error::Core(e) => e.suggestions(),
            Error::Context { source, .. } => source.suggestions(),
            Error::Io(_) => vec![],
        }
    }
}
