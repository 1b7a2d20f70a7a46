//! Domain layer for the rod stock ledger.
//!
//! This crate provides:
//! - Stock ledger: rod stock entries, deposits, withdrawals and the
//!   append-only inventory history
//! - Process lifecycle with its `in-progress -> completed` state machine
//! - Output reconciliation and the mass-conservation summary
//! - Process groups and whole-store snapshots
//! - `InventoryService`, which turns each operation into one atomic commit

pub mod commands;
pub mod entity;
pub mod error;
pub mod group;
pub mod ledger;
pub mod process;
pub mod reconciliation;
pub mod service;
pub mod snapshot;

pub use commands::{CreateGroup, DepositStock, FinalizeProcess, UpdateGroup, WithdrawStock};
pub use entity::Entity;
pub use error::DomainError;
pub use group::{GroupError, ProcessGroup};
pub use ledger::{
    CatalogEntry, CatalogKind, HistoryFilter, InventoryTransaction, LedgerError, LedgerEvent,
    ProcessTag, RodStockEntry, StockLedger, TransactionKind,
};
pub use process::{NewProcess, Process, ProcessError, ProcessNumber, ProcessStatus};
pub use reconciliation::{
    FinishedGood, FinishedGoodInput, LeftoverMaterial, NonConformingInput, NonConformingItem,
    OutputRecords, ProcessOutputs, ProcessSummary, Reconciliation, RejectedInput, RejectedItem, WeightLossInput,
    WeightLossItem, reconcile,
};
pub use service::{DepositOutcome, FinalizeOutcome, InventoryService, WithdrawOutcome};
pub use snapshot::InventorySnapshot;
