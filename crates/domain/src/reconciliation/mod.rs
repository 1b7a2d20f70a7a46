//! Output reconciliation.
//!
//! Turns the outputs reported for a process into output records and a
//! mass-conservation summary.

mod inputs;
mod plan;
mod records;
mod summary;

pub use inputs::{
    FinishedGoodInput, NonConformingInput, ProcessOutputs, RejectedInput, WeightLossInput,
};
pub use plan::OutputRecords;
pub use records::{
    FinishedGood, LeftoverMaterial, NonConformingItem, ProcessSummary, RejectedItem,
    WeightLossItem,
};
pub use summary::{Reconciliation, reconcile};
