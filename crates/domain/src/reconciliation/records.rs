use chrono::{DateTime, Utc};
use common::{Diameter, RecordId, Weight};
use record_store::Collection;
use serde::{Deserialize, Serialize};

use crate::entity::Entity;

macro_rules! process_entity {
    ($ty:ty, $collection:expr) => {
        impl Entity for $ty {
            const COLLECTION: Collection = $collection;

            fn key(&self) -> String {
                self.id.clone()
            }

            fn process_key(&self) -> Option<&str> {
                Some(&self.process_id)
            }
        }
    };
}

fn new_id() -> String {
    RecordId::new().to_string()
}

/// Good items produced by a process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishedGood {
    pub id: String,
    pub process_id: String,
    #[serde(rename = "number", alias = "count")]
    pub count: u32,
    /// Item height in millimetres.
    pub height: f64,
    pub weight_per_item: Weight,
    pub weight: Weight,
    pub created_at: DateTime<Utc>,
}

impl FinishedGood {
    pub fn new(process_id: &str, count: u32, height: f64, weight_per_item: Weight) -> Self {
        Self {
            id: new_id(),
            process_id: process_id.to_string(),
            count,
            height,
            weight_per_item,
            weight: weight_per_item.multiply(count),
            created_at: Utc::now(),
        }
    }
}

process_entity!(FinishedGood, Collection::FinishedGoods);

/// Items outside tolerance that are still usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NonConformingItem {
    pub id: String,
    pub process_id: String,
    #[serde(rename = "number", alias = "count")]
    pub count: u32,
    pub height: f64,
    pub weight_per_item: Weight,
    pub weight: Weight,
    #[serde(default)]
    pub include_in_report: bool,
    pub created_at: DateTime<Utc>,
}

impl NonConformingItem {
    pub fn new(
        process_id: &str,
        count: u32,
        height: f64,
        weight_per_item: Weight,
        include_in_report: bool,
    ) -> Self {
        Self {
            id: new_id(),
            process_id: process_id.to_string(),
            count,
            height,
            weight_per_item,
            weight: weight_per_item.multiply(count),
            include_in_report,
            created_at: Utc::now(),
        }
    }
}

process_entity!(NonConformingItem, Collection::NonConformingItems);

/// Scrapped items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedItem {
    pub id: String,
    pub process_id: String,
    #[serde(rename = "number", alias = "count")]
    pub count: u32,
    pub weight_per_item: Weight,
    pub weight: Weight,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub include_in_report: bool,
    pub created_at: DateTime<Utc>,
}

impl RejectedItem {
    pub fn new(
        process_id: &str,
        count: u32,
        weight_per_item: Weight,
        reason: String,
        include_in_report: bool,
    ) -> Self {
        Self {
            id: new_id(),
            process_id: process_id.to_string(),
            count,
            weight_per_item,
            weight: weight_per_item.multiply(count),
            reason,
            include_in_report,
            created_at: Utc::now(),
        }
    }
}

process_entity!(RejectedItem, Collection::RejectedItems);

/// Material lost to cutting and off-cuts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightLossItem {
    pub id: String,
    pub process_id: String,
    pub weight: Weight,
    pub weight_loss_per_rod: Weight,
    pub created_at: DateTime<Utc>,
}

impl WeightLossItem {
    pub fn new(process_id: &str, weight: Weight, weight_loss_per_rod: Weight) -> Self {
        Self {
            id: new_id(),
            process_id: process_id.to_string(),
            weight,
            weight_loss_per_rod,
            created_at: Utc::now(),
        }
    }
}

process_entity!(WeightLossItem, Collection::WeightLossItems);

/// Mass-conservation summary written when a process completes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessSummary {
    pub id: String,
    pub process_id: String,
    pub total_weight_used: Weight,
    pub total_weight_loss: Weight,
    pub remaining_weight: Weight,
    pub weight_loss_per_rod: Weight,
    #[serde(rename = "addRemainingToStock", alias = "addedBackToStock")]
    pub added_back_to_stock: bool,
    pub created_at: DateTime<Utc>,
}

process_entity!(ProcessSummary, Collection::ProcessSummary);

/// Leftover material returned to stock by a completed process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeftoverMaterial {
    pub id: String,
    pub process_id: String,
    pub diameter: Diameter,
    pub weight: Weight,
    pub created_at: DateTime<Utc>,
}

impl LeftoverMaterial {
    pub fn new(process_id: &str, diameter: Diameter, weight: Weight) -> Self {
        Self {
            id: new_id(),
            process_id: process_id.to_string(),
            diameter,
            weight,
            created_at: Utc::now(),
        }
    }
}

process_entity!(LeftoverMaterial, Collection::LeftoverMaterials);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_is_count_times_per_item() {
        let good = FinishedGood::new("p", 4, 100.0, Weight::from_kg(2.0).unwrap());
        assert_eq!(good.weight, Weight::from_kg(8.0).unwrap());
    }

    #[test]
    fn count_is_stored_as_number() {
        let good = FinishedGood::new("p", 4, 100.0, Weight::from_kg(2.0).unwrap());
        let json = serde_json::to_value(&good).unwrap();
        assert_eq!(json["number"], 4);
        assert_eq!(json["processId"], "p");
        assert_eq!(json["weightPerItem"], 2.0);
    }

    #[test]
    fn summary_uses_stored_flag_name() {
        let summary = ProcessSummary {
            id: "s".to_string(),
            process_id: "p".to_string(),
            total_weight_used: Weight::from_kg(12.0).unwrap(),
            total_weight_loss: Weight::from_kg(1.0).unwrap(),
            remaining_weight: Weight::from_kg(3.0).unwrap(),
            weight_loss_per_rod: Weight::zero(),
            added_back_to_stock: true,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["addRemainingToStock"], true);

        let record = summary.to_record().unwrap();
        assert_eq!(record.collection, Collection::ProcessSummary);
        assert_eq!(record.process_id.as_deref(), Some("p"));
    }
}
