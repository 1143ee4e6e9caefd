//! Error types for catalog and project loading.

/// Errors that can occur when loading or validating a catalog or project file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading a file.
    #[error("failed to read {path}: {source}")]
    IoError {
        /// The file that could not be read.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The catalog could not be downloaded.
    #[error("failed to fetch {url}: {reason}")]
    FetchError {
        /// The URL that was requested.
        url: String,
        /// Transport or HTTP status failure.
        reason: String,
    },

    /// The content could not be parsed.
    #[error("failed to parse {origin}: {reason}")]
    ParseError {
        /// Where the content came from (a path, URL, or `<string>`).
        origin: String,
        /// The parser's message.
        reason: String,
    },

    /// A required field is missing or empty.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A value failed validation.
    #[error("validation error: {0}")]
    ValidationError(String),
}

impl ConfigError {
    pub(crate) fn parse(origin: &str, reason: impl ToString) -> Self {
        ConfigError::ParseError {
            origin: origin.to_string(),
            reason: reason.to_string(),
        }
    }
}
