use thiserror::Error;

/// Errors of a cache backend. Never surfaced to callers.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The request to the backend failed.
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    /// The backend returned an error.
    #[error("cache backend error: {0}")]
    Backend(String),
    /// A cached value could not be decoded.
    #[error("malformed cached value for {key}: {value}")]
    Malformed {
        /// The key.
        key: String,
        /// The raw value.
        value: String,
    },
}
