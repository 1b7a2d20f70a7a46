//! Domain error types.

use common::UnitError;
use record_store::StoreError;
use thiserror::Error;

use crate::group::GroupError;
use crate::ledger::LedgerError;
use crate::process::ProcessError;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A stock ledger rule was violated.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// A process lifecycle rule was violated.
    #[error(transparent)]
    Process(#[from] ProcessError),

    /// A group operation was rejected.
    #[error(transparent)]
    Group(#[from] GroupError),

    /// An error occurred in the record store.
    #[error("Record store error: {0}")]
    Store(#[from] StoreError),

    /// A number could not be converted to a unit type.
    #[error("Unit error: {0}")]
    Unit(#[from] UnitError),

    /// An imported snapshot failed validation.
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DomainError {
    /// Returns true for a withdrawal or reservation that exceeds available stock.
    pub fn is_insufficient_stock(&self) -> bool {
        matches!(self, DomainError::Ledger(LedgerError::InsufficientStock { .. }))
    }

    /// Returns true for an operation attempted in the wrong process state.
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, DomainError::Process(ProcessError::InvalidState { .. }))
    }

    /// Returns true when the referenced process does not exist.
    pub fn is_process_not_found(&self) -> bool {
        matches!(self, DomainError::Process(ProcessError::ProcessNotFound(_)))
    }

    /// Returns true when a supplied process number is already taken.
    pub fn is_duplicate_process_number(&self) -> bool {
        matches!(self, DomainError::Process(ProcessError::DuplicateProcessNumber(_)))
    }

    /// Returns true for a rejected weight, count or length.
    pub fn is_invalid_quantity(&self) -> bool {
        matches!(
            self,
            DomainError::Ledger(LedgerError::InvalidQuantity { .. })
                | DomainError::Process(ProcessError::InvalidQuantity { .. })
        )
    }

    /// Returns true when the referenced group does not exist.
    pub fn is_group_not_found(&self) -> bool {
        matches!(self, DomainError::Group(GroupError::GroupNotFound(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{Diameter, Weight};

    #[test]
    fn predicates_match_taxonomy() {
        let err: DomainError = LedgerError::InsufficientStock {
            diameter: Diameter::from_mm(12.0).unwrap(),
            requested: Weight::from_kg(5.0).unwrap(),
            available: Weight::from_kg(1.0).unwrap(),
        }
        .into();
        assert!(err.is_insufficient_stock());
        assert!(!err.is_invalid_quantity());

        let err: DomainError = ProcessError::ProcessNotFound("p".to_string()).into();
        assert!(err.is_process_not_found());

        let err: DomainError = ProcessError::InvalidQuantity {
            field: "numberOfRods",
            value: "0".to_string(),
        }
        .into();
        assert!(err.is_invalid_quantity());

        let err: DomainError = GroupError::GroupNotFound("g".to_string()).into();
        assert!(err.is_group_not_found());
    }

    #[test]
    fn messages_are_readable() {
        let err: DomainError = LedgerError::InsufficientStock {
            diameter: Diameter::from_mm(12.0).unwrap(),
            requested: Weight::from_kg(5.0).unwrap(),
            available: Weight::from_kg(1.0).unwrap(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Insufficient stock for 12mm: requested 5.000 kg, available 1.000 kg"
        );
    }
}
