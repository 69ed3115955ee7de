//! Error types for image fetching, embedding and ranking.

use thiserror::Error;

/// Errors that can occur while ranking images.
#[derive(Debug, Error)]
pub enum SearchError {
    /// An image URL answered with a non-success status.
    #[error("HTTP {status} fetching {url}")]
    Http { url: String, status: u16 },

    /// An error propagated from `reqwest` (connect, timeout, body read).
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The embedding model rejected its input or failed to run.
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Text and image embeddings live in different spaces.
    #[error("embedding dimensions differ: text has {text}, image has {image}")]
    DimensionMismatch { text: usize, image: usize },

    /// No embedding backend was compiled in or it failed to load.
    #[error("no embedding backend: {0}")]
    Unavailable(String),

    /// A background fetch or embedding task was cancelled or panicked.
    #[error("task failed: {0}")]
    Task(String),
}

impl SearchError {
    /// Returns `true` when the error is transient and the fetch may
    /// succeed if retried.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http { status, .. } => *status == 429 || *status >= 500,
            Self::Request(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}

/// Convenience alias for search results.
pub type SearchResult<T> = std::result::Result<T, SearchError>;
