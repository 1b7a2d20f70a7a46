use thiserror::Error;

use crate::Collection;

/// Errors that can occur when interacting with the record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A record with this id already exists in the collection.
    #[error("Duplicate record {id} in collection {collection}")]
    DuplicateRecord { collection: Collection, id: String },

    /// The record was not found in the collection.
    #[error("Record {id} not found in collection {collection}")]
    RecordNotFound { collection: Collection, id: String },

    /// The collection name is not one of the known collections.
    #[error("Unknown collection: {0}")]
    UnknownCollection(String),

    /// The transaction is malformed and was rejected before applying.
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    /// A commit was failed on purpose by the in-memory store.
    #[error("Injected commit failure")]
    InjectedFailure,

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for record store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
