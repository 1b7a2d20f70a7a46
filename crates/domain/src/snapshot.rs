//! Whole-store snapshot for export and import.

use std::collections::HashSet;

use record_store::{Collection, Record, RecordStore, Transaction};
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, load_all};
use crate::error::DomainError;
use crate::group::ProcessGroup;
use crate::ledger::{CatalogEntry, CatalogKind, InventoryTransaction, RodStockEntry};
use crate::process::Process;
use crate::reconciliation::{
    FinishedGood, LeftoverMaterial, NonConformingItem, ProcessSummary, RejectedItem,
    WeightLossItem,
};

/// Every collection, each in insertion order.
///
/// Unknown collection names are rejected when parsing. A collection missing
/// from the input is treated as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InventorySnapshot {
    #[serde(default)]
    pub rods: Vec<RodStockEntry>,
    #[serde(default)]
    pub processes: Vec<Process>,
    #[serde(default)]
    pub finished_goods: Vec<FinishedGood>,
    #[serde(default)]
    pub non_conforming_items: Vec<NonConformingItem>,
    #[serde(default)]
    pub rejected_items: Vec<RejectedItem>,
    #[serde(default)]
    pub weight_loss_items: Vec<WeightLossItem>,
    #[serde(default)]
    pub leftover_materials: Vec<LeftoverMaterial>,
    #[serde(default)]
    pub process_summary: Vec<ProcessSummary>,
    #[serde(default)]
    pub diameters: Vec<CatalogEntry>,
    #[serde(default)]
    pub blade_diameters: Vec<CatalogEntry>,
    #[serde(default)]
    pub inventory_history: Vec<InventoryTransaction>,
    #[serde(default)]
    pub process_groups: Vec<ProcessGroup>,
}

impl InventorySnapshot {
    /// Reads every collection from the store.
    pub async fn load<S: RecordStore + ?Sized>(store: &S) -> Result<Self, DomainError> {
        Ok(Self {
            rods: load_all(store).await?,
            processes: load_all(store).await?,
            finished_goods: load_all(store).await?,
            non_conforming_items: load_all(store).await?,
            rejected_items: load_all(store).await?,
            weight_loss_items: load_all(store).await?,
            leftover_materials: load_all(store).await?,
            process_summary: load_all(store).await?,
            diameters: load_catalog(store, CatalogKind::Rod).await?,
            blade_diameters: load_catalog(store, CatalogKind::Blade).await?,
            inventory_history: load_all(store).await?,
            process_groups: load_all(store).await?,
        })
    }

    /// Total number of records across collections.
    pub fn record_count(&self) -> usize {
        self.rods.len()
            + self.processes.len()
            + self.finished_goods.len()
            + self.non_conforming_items.len()
            + self.rejected_items.len()
            + self.weight_loss_items.len()
            + self.leftover_materials.len()
            + self.process_summary.len()
            + self.diameters.len()
            + self.blade_diameters.len()
            + self.inventory_history.len()
            + self.process_groups.len()
    }

    /// Checks record invariants that the parser cannot.
    pub fn validate(&self) -> Result<(), DomainError> {
        for rod in &self.rods {
            if !rod.weight.is_positive() {
                return Err(DomainError::InvalidSnapshot(format!(
                    "rod {} has non-positive weight {}",
                    rod.id, rod.weight
                )));
            }
            if !rod.diameter.is_positive() {
                return Err(DomainError::InvalidSnapshot(format!(
                    "rod {} has non-positive diameter",
                    rod.id
                )));
            }
        }
        for process in &self.processes {
            if !process.weight_used.is_positive() || process.number_of_rods == 0 {
                return Err(DomainError::InvalidSnapshot(format!(
                    "process {} has no weight or rods",
                    process.id
                )));
            }
        }

        let mut numbers = HashSet::new();
        if let Some(dup) = self
            .processes
            .iter()
            .find(|p| !numbers.insert(p.process_number.as_str()))
        {
            return Err(DomainError::InvalidSnapshot(format!(
                "duplicate process number {}",
                dup.process_number
            )));
        }

        unique_keys(&self.rods)?;
        unique_keys(&self.processes)?;
        unique_keys(&self.finished_goods)?;
        unique_keys(&self.non_conforming_items)?;
        unique_keys(&self.rejected_items)?;
        unique_keys(&self.weight_loss_items)?;
        unique_keys(&self.leftover_materials)?;
        unique_keys(&self.process_summary)?;
        unique_keys(&self.inventory_history)?;
        unique_keys(&self.process_groups)?;
        unique_catalog(Collection::Diameters, &self.diameters)?;
        unique_catalog(Collection::BladeDiameters, &self.blade_diameters)?;

        Ok(())
    }

    /// Builds one transaction that replaces every collection.
    pub fn to_transaction(&self) -> Result<Transaction, DomainError> {
        Ok(Transaction::new()
            .replace_all(Collection::Rods, records(&self.rods)?)
            .replace_all(Collection::Processes, records(&self.processes)?)
            .replace_all(Collection::FinishedGoods, records(&self.finished_goods)?)
            .replace_all(
                Collection::NonConformingItems,
                records(&self.non_conforming_items)?,
            )
            .replace_all(Collection::RejectedItems, records(&self.rejected_items)?)
            .replace_all(Collection::WeightLossItems, records(&self.weight_loss_items)?)
            .replace_all(
                Collection::LeftoverMaterials,
                records(&self.leftover_materials)?,
            )
            .replace_all(Collection::ProcessSummary, records(&self.process_summary)?)
            .replace_all(
                Collection::Diameters,
                catalog_records(CatalogKind::Rod, &self.diameters)?,
            )
            .replace_all(
                Collection::BladeDiameters,
                catalog_records(CatalogKind::Blade, &self.blade_diameters)?,
            )
            .replace_all(
                Collection::InventoryHistory,
                records(&self.inventory_history)?,
            )
            .replace_all(Collection::ProcessGroups, records(&self.process_groups)?))
    }
}

async fn load_catalog<S: RecordStore + ?Sized>(
    store: &S,
    kind: CatalogKind,
) -> Result<Vec<CatalogEntry>, DomainError> {
    let records = store.get_all(kind.collection()).await?;
    records
        .iter()
        .map(|r| r.decode().map_err(DomainError::from))
        .collect()
}

fn records<E: Entity>(items: &[E]) -> Result<Vec<Record>, DomainError> {
    items
        .iter()
        .map(|item| item.to_record().map_err(DomainError::from))
        .collect()
}

fn catalog_records(kind: CatalogKind, items: &[CatalogEntry]) -> Result<Vec<Record>, DomainError> {
    items
        .iter()
        .map(|item| item.to_record(kind).map_err(DomainError::from))
        .collect()
}

fn unique_keys<E: Entity>(items: &[E]) -> Result<(), DomainError> {
    let mut seen = HashSet::new();
    for item in items {
        let key = item.key();
        if !seen.insert(key.clone()) {
            return Err(DomainError::InvalidSnapshot(format!(
                "duplicate id {key} in {}",
                E::COLLECTION
            )));
        }
    }
    Ok(())
}

fn unique_catalog(collection: Collection, items: &[CatalogEntry]) -> Result<(), DomainError> {
    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(item.key()) {
            return Err(DomainError::InvalidSnapshot(format!(
                "duplicate diameter {} in {collection}",
                item.diameter
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{Diameter, Weight};

    fn rod(weight: f64) -> RodStockEntry {
        RodStockEntry::new(
            Diameter::from_mm(12.0).unwrap(),
            Weight::from_kg(weight).unwrap(),
            None,
        )
    }

    #[test]
    fn unknown_collection_is_rejected() {
        let result: Result<InventorySnapshot, _> = serde_json::from_value(serde_json::json!({
            "rods": [],
            "widgets": []
        }));
        assert!(result.is_err());
    }

    #[test]
    fn missing_collections_default_to_empty() {
        let snapshot: InventorySnapshot =
            serde_json::from_value(serde_json::json!({ "diameters": [{ "diameter": 12 }] }))
                .unwrap();
        assert_eq!(snapshot.diameters.len(), 1);
        assert!(snapshot.rods.is_empty());
        assert_eq!(snapshot.record_count(), 1);
    }

    #[test]
    fn malformed_record_is_rejected() {
        let result: Result<InventorySnapshot, _> = serde_json::from_value(serde_json::json!({
            "rods": [{ "id": "r1", "diameter": "twelve", "weight": 1.0, "createdAt": "2024-01-01T00:00:00Z" }]
        }));
        assert!(result.is_err());
    }

    #[test]
    fn non_positive_rod_weight_fails_validation() {
        let mut bad = rod(1.0);
        bad.weight = Weight::zero();
        let snapshot = InventorySnapshot {
            rods: vec![bad],
            ..Default::default()
        };
        assert!(matches!(
            snapshot.validate(),
            Err(DomainError::InvalidSnapshot(_))
        ));
    }

    #[test]
    fn duplicate_ids_fail_validation() {
        let a = rod(1.0);
        let snapshot = InventorySnapshot {
            rods: vec![a.clone(), a],
            ..Default::default()
        };
        assert!(matches!(
            snapshot.validate(),
            Err(DomainError::InvalidSnapshot(msg)) if msg.contains("duplicate id")
        ));
    }

    #[test]
    fn duplicate_process_numbers_fail_validation() {
        let input = crate::process::NewProcess::new(
            "Batch",
            Diameter::from_mm(12.0).unwrap(),
            Weight::from_kg(1.0).unwrap(),
            Diameter::from_mm(3.0).unwrap(),
            1,
        )
        .with_process_number("PROC-1");
        let first = input.clone().into_process().unwrap();
        let mut second = input.into_process().unwrap();
        second.id = format!("{}-copy", first.id);

        let snapshot = InventorySnapshot {
            processes: vec![first, second],
            ..Default::default()
        };
        assert!(matches!(
            snapshot.validate(),
            Err(DomainError::InvalidSnapshot(msg)) if msg.contains("duplicate process number")
        ));
    }

    #[test]
    fn transaction_replaces_every_collection() {
        let snapshot = InventorySnapshot {
            rods: vec![rod(1.0), rod(2.0)],
            ..Default::default()
        };
        snapshot.validate().unwrap();

        let tx = snapshot.to_transaction().unwrap();
        assert_eq!(tx.len(), Collection::ALL.len());
    }
}
