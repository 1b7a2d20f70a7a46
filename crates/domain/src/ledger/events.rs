use record_store::{Collection, WriteOp};
use serde::{Deserialize, Serialize};

use crate::entity::Entity;

use super::{InventoryTransaction, RodStockEntry};

/// Changes produced by ledger commands.
///
/// Each event maps onto exactly one record-store write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum LedgerEvent {
    /// A new stock entry was created.
    EntryCreated(RodStockEntry),

    /// An entry absorbed part of a withdrawal and keeps its remaining weight.
    EntryReduced(RodStockEntry),

    /// An entry was fully consumed and removed.
    EntryConsumed { id: String },

    /// A line was appended to the inventory history.
    TransactionRecorded(InventoryTransaction),
}

impl LedgerEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            LedgerEvent::EntryCreated(_) => "EntryCreated",
            LedgerEvent::EntryReduced(_) => "EntryReduced",
            LedgerEvent::EntryConsumed { .. } => "EntryConsumed",
            LedgerEvent::TransactionRecorded(_) => "TransactionRecorded",
        }
    }

    /// Converts the event into the write that persists it.
    pub fn to_write_op(&self) -> Result<WriteOp, serde_json::Error> {
        Ok(match self {
            LedgerEvent::EntryCreated(entry) => WriteOp::Insert(entry.to_record()?),
            LedgerEvent::EntryReduced(entry) => WriteOp::Put(entry.to_record()?),
            LedgerEvent::EntryConsumed { id } => WriteOp::Delete {
                collection: Collection::Rods,
                id: id.clone(),
            },
            LedgerEvent::TransactionRecorded(tx) => WriteOp::Insert(tx.to_record()?),
        })
    }
}
