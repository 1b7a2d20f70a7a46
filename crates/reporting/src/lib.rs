//! Read-only reporting for the rod stock ledger.
//!
//! This crate provides:
//! - Stock statistics by diameter
//! - Process details joined with outputs, efficiency and waste percentage
//! - Output listings with a fixed field list per report kind
//! - Process and group filters

pub mod error;
pub mod filter;
pub mod report;
pub mod reporter;
pub mod views;

pub use error::{ReportError, Result};
pub use filter::{ReportFilter, Scope};
pub use report::{Report, ReportKind};
pub use reporter::Reporter;
pub use views::{
    DiameterStats, FinishedGoodRow, NonConformingRow, ProcessDetails, RejectedRow, StockStats,
    WeightLossRow,
};
