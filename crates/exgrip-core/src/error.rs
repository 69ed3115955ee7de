use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The query carried no field that produces a comparison.
    #[error("No valid fields provided for filtering.")]
    NoCriteria,

    /// A length expression matched none of the recognised forms.
    #[error("malformed length expression {input:?}: {reason}")]
    MalformedLength { input: String, reason: String },

    /// The predicate was valid but the scan returned nothing.
    #[error("No items found matching the criteria.")]
    NoMatches,

    /// The store could not be reached (poisoned lock, cancelled task).
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    /// Stored data the catalog cannot represent.
    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl Error {
    /// Returns `true` when the caller supplied an unusable query.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::NoCriteria | Self::MalformedLength { .. })
    }

    /// Returns `true` when the query was well formed but matched nothing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NoMatches)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
