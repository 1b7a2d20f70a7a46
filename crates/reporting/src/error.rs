//! Reporting error types.

use domain::DomainError;
use record_store::StoreError;
use thiserror::Error;

/// Errors that can occur while building a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// A domain lookup failed, such as an unknown group.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// An error occurred in the record store.
    #[error("Record store error: {0}")]
    Store(#[from] StoreError),

    /// A stored record could not be decoded.
    #[error("Record deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// The report kind is not one of the known kinds.
    #[error("Unknown report: {0}")]
    UnknownReport(String),
}

impl ReportError {
    /// Returns true when a filter referenced a missing group.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ReportError::Domain(e) if e.is_group_not_found())
    }
}

/// Result type for reporting operations.
pub type Result<T> = std::result::Result<T, ReportError>;
