use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::StoreError;

/// The named collections a record can live in.
///
/// Names match the keys of the exported snapshot format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Collection {
    Rods,
    Processes,
    FinishedGoods,
    NonConformingItems,
    RejectedItems,
    WeightLossItems,
    LeftoverMaterials,
    ProcessSummary,
    Diameters,
    BladeDiameters,
    InventoryHistory,
    ProcessGroups,
}

impl Collection {
    /// Every collection, in snapshot order.
    pub const ALL: [Collection; 12] = [
        Collection::Rods,
        Collection::Processes,
        Collection::FinishedGoods,
        Collection::NonConformingItems,
        Collection::RejectedItems,
        Collection::WeightLossItems,
        Collection::LeftoverMaterials,
        Collection::ProcessSummary,
        Collection::Diameters,
        Collection::BladeDiameters,
        Collection::InventoryHistory,
        Collection::ProcessGroups,
    ];

    /// Returns the collection's name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Rods => "rods",
            Collection::Processes => "processes",
            Collection::FinishedGoods => "finishedGoods",
            Collection::NonConformingItems => "nonConformingItems",
            Collection::RejectedItems => "rejectedItems",
            Collection::WeightLossItems => "weightLossItems",
            Collection::LeftoverMaterials => "leftoverMaterials",
            Collection::ProcessSummary => "processSummary",
            Collection::Diameters => "diameters",
            Collection::BladeDiameters => "bladeDiameters",
            Collection::InventoryHistory => "inventoryHistory",
            Collection::ProcessGroups => "processGroups",
        }
    }
}

impl FromStr for Collection {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Collection::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| StoreError::UnknownCollection(s.to_string()))
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored record: an opaque JSON payload keyed by id within a collection.
///
/// `process_id` is a secondary key used to look up all records that belong
/// to one process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// The collection this record belongs to.
    pub collection: Collection,

    /// Key of the record, unique within its collection.
    pub id: String,

    /// Optional secondary key linking the record to a process.
    pub process_id: Option<String>,

    /// When the record was last written.
    pub stored_at: DateTime<Utc>,

    /// The record body as JSON.
    pub payload: serde_json::Value,
}

impl Record {
    /// Creates a record from a raw JSON payload.
    pub fn new(collection: Collection, id: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            collection,
            id: id.into(),
            process_id: None,
            stored_at: Utc::now(),
            payload,
        }
    }

    /// Creates a record by serializing a value.
    pub fn from_value<T: Serialize>(
        collection: Collection,
        id: impl Into<String>,
        value: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self::new(collection, id, serde_json::to_value(value)?))
    }

    /// Sets the secondary process key.
    pub fn with_process_id(mut self, process_id: impl Into<String>) -> Self {
        self.process_id = Some(process_id.into());
        self
    }

    /// Deserializes the payload into a typed value.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }
}
