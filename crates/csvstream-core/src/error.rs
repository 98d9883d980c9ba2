use thiserror::Error;

/// Canonical result for core.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Error with context chain for better debugging
    #[error("Error in {context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    /// Add context to an error, creating an error chain.
    ///
    /// # Example
    /// ```rust,no_run
    /// use csvstream_core::error::Error;
    /// let err = Error::Config("quote and delimiter are both ','".into());
    /// let err = err.with_context("while loading pipeline.yaml");
    /// ```
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Error::Context {
            context: context.into(),
            source: Box::new(self) as Box<dyn std::error::Error + Send + Sync>,
        }
    }

    /// Get suggestions for common errors.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Error::Config(msg) => {
                if msg.contains("collide") {
                    vec![
                        "Pick distinct quote, delimiter, and terminator characters".into(),
                        "The default terminator already accepts '\\r', '\\n', and \"\\r\\n\"".into(),
                    ]
                } else if msg.contains("buffer") {
                    vec!["Use a buffer capacity of at least 4 bytes (default is 128 KiB)".into()]
                } else if msg.contains("ASCII") {
                    vec!["Multi-byte delimiters, quotes, and terminators are not supported".into()]
                } else {
                    vec![]
                }
            }
            _ => vec![],
        }
    }
}
