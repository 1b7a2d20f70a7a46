use chrono::{DateTime, Utc};
use common::{Diameter, RecordId, Weight};
use record_store::Collection;
use serde::{Deserialize, Serialize};

use crate::entity::Entity;

/// One discrete batch of raw material in stock.
///
/// Present entries always hold a positive weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RodStockEntry {
    pub id: String,
    pub diameter: Diameter,
    pub weight: Weight,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_length: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl RodStockEntry {
    /// Creates a new entry with a fresh id.
    pub fn new(diameter: Diameter, weight: Weight, total_length: Option<f64>) -> Self {
        Self {
            id: RecordId::new().to_string(),
            diameter,
            weight,
            total_length,
            created_at: Utc::now(),
        }
    }
}

impl Entity for RodStockEntry {
    const COLLECTION: Collection = Collection::Rods;

    fn key(&self) -> String {
        self.id.clone()
    }
}
