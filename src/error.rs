//! Error types for the review feed.
//!
//! Nothing in this module is fatal to the feed. A [`FetchError`] leaves the
//! list in its last good state and the next trigger retries from the same
//! offset. Image failures never reach this module at all: they degrade to
//! placeholders inside the resolver.

/// Failure of a single page fetch (or of a single image load).
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The source could not be reached or refused the request.
    #[error("review source unavailable: {0}")]
    Unavailable(String),

    /// The response could not be decoded.
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Reading a local fixture or image failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure to load or validate a [`FeedConfig`](crate::config::FeedConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The TOML document did not parse.
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field parsed but holds an unusable value.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        /// Name of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Returned by [`PaginationEngine::row_at`](crate::engine::PaginationEngine::row_at)
/// for an index past the displayable rows. A correctly driven presenter never
/// sees this.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RowIndexError {
    /// `index` is not below the displayable row count.
    #[error("row index {index} out of range for {count} displayable rows")]
    OutOfRange {
        /// The requested index.
        index: usize,
        /// Displayable rows at the time of the call, summary row included.
        count: usize,
    },
}
