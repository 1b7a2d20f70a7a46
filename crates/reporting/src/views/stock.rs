use std::collections::BTreeMap;

use common::{Diameter, Weight};
use domain::RodStockEntry;
use serde::Serialize;

/// Stock held at one diameter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiameterStats {
    pub diameter: Diameter,
    pub total_weight: Weight,
    pub entry_count: usize,
}

/// Stock grouped by diameter, ascending, plus overall totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockStats {
    pub diameters: Vec<DiameterStats>,
    pub total_entries: usize,
    pub total_weight: Weight,
    pub diameter_count: usize,
}

impl StockStats {
    pub fn from_entries(entries: &[RodStockEntry]) -> Self {
        let mut by_diameter: BTreeMap<Diameter, (Weight, usize)> = BTreeMap::new();
        for entry in entries {
            let slot = by_diameter
                .entry(entry.diameter)
                .or_insert((Weight::zero(), 0));
            slot.0 += entry.weight;
            slot.1 += 1;
        }

        let diameters: Vec<_> = by_diameter
            .into_iter()
            .map(|(diameter, (total_weight, entry_count))| DiameterStats {
                diameter,
                total_weight,
                entry_count,
            })
            .collect();

        Self {
            total_entries: entries.len(),
            total_weight: diameters.iter().map(|d| d.total_weight).sum(),
            diameter_count: diameters.len(),
            diameters,
        }
    }

    pub fn for_diameter(&self, diameter: Diameter) -> Option<&DiameterStats> {
        self.diameters.iter().find(|d| d.diameter == diameter)
    }
}
