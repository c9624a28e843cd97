//! Catalog store error types.

use thiserror::Error;

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors raised by the catalog store.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The database could not be opened or configured.
    #[error("failed to open catalog database: {reason}")]
    Open { reason: String },

    /// A query or statement failed.
    #[error("catalog query failed: {0}")]
    Query(String),

    /// A stored value could not be decoded into its typed form.
    #[error("corrupt catalog row: {0}")]
    Corrupt(String),

    /// JSON-encoded list columns failed to round-trip.
    #[error("catalog serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<rusqlite::Error> for CatalogError {
    fn from(err: rusqlite::Error) -> Self {
        CatalogError::Query(err.to_string())
    }
}
