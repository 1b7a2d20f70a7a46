//! Shared types for the rod stock ledger.
//!
//! - [`RecordId`] opaque identifier used by every persisted entity
//! - [`Weight`] and [`Diameter`] fixed-point quantities
//! - [`LengthUnit`] and [`MassUnit`] conversions to canonical units (mm, kg)

pub mod types;
pub mod units;

pub use types::RecordId;
pub use units::{Diameter, LengthUnit, MassUnit, UnitError, Weight, convert_length};
