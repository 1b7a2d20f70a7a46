//! Stock ledger: rod stock entries and the inventory history.

mod catalog;
mod events;
mod history;
mod rod;
mod stock;

pub use catalog::{CatalogEntry, CatalogKind};
pub use events::LedgerEvent;
pub use history::{HistoryFilter, InventoryTransaction, TransactionKind};
pub use rod::RodStockEntry;
pub use stock::{ProcessTag, StockLedger};

use common::{Diameter, Weight};
use thiserror::Error;

/// Errors raised by the stock ledger.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// The withdrawal exceeds the stock available at that diameter.
    #[error("Insufficient stock for {diameter}: requested {requested}, available {available}")]
    InsufficientStock {
        diameter: Diameter,
        requested: Weight,
        available: Weight,
    },

    /// A weight, diameter or length was not positive.
    #[error("Invalid quantity for {field}: {value} (must be greater than 0)")]
    InvalidQuantity { field: &'static str, value: String },
}
