//! Read-only rollups over stored records.

mod outputs;
mod process_details;
mod stock;

pub use outputs::{FinishedGoodRow, NonConformingRow, RejectedRow, WeightLossRow};
pub use process_details::ProcessDetails;
pub use stock::{DiameterStats, StockStats};

pub(crate) use outputs::ProcessNames;
pub(crate) use process_details::Outputs;
