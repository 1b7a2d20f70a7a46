use std::collections::HashMap;

use chrono::{DateTime, Utc};
use common::Weight;
use domain::{FinishedGood, NonConformingItem, Process, RejectedItem, WeightLossItem};
use serde::Serialize;

/// Maps process ids to names for output listings.
pub(crate) struct ProcessNames(HashMap<String, String>);

impl ProcessNames {
    pub(crate) fn new(processes: &[Process]) -> Self {
        Self(
            processes
                .iter()
                .map(|p| (p.id.clone(), p.name.clone()))
                .collect(),
        )
    }

    /// Name of the process, or empty when it no longer exists.
    fn get(&self, process_id: &str) -> String {
        self.0.get(process_id).cloned().unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishedGoodRow {
    pub id: String,
    pub process_id: String,
    pub process_name: String,
    pub number: u32,
    pub height: f64,
    pub weight_per_item: Weight,
    pub weight: Weight,
    pub created_at: DateTime<Utc>,
}

impl FinishedGoodRow {
    pub(crate) fn new(item: &FinishedGood, names: &ProcessNames) -> Self {
        Self {
            id: item.id.clone(),
            process_id: item.process_id.clone(),
            process_name: names.get(&item.process_id),
            number: item.count,
            height: item.height,
            weight_per_item: item.weight_per_item,
            weight: item.weight,
            created_at: item.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NonConformingRow {
    pub id: String,
    pub process_id: String,
    pub process_name: String,
    pub number: u32,
    pub height: f64,
    pub weight_per_item: Weight,
    pub weight: Weight,
    pub include_in_report: bool,
    pub created_at: DateTime<Utc>,
}

impl NonConformingRow {
    pub(crate) fn new(item: &NonConformingItem, names: &ProcessNames) -> Self {
        Self {
            id: item.id.clone(),
            process_id: item.process_id.clone(),
            process_name: names.get(&item.process_id),
            number: item.count,
            height: item.height,
            weight_per_item: item.weight_per_item,
            weight: item.weight,
            include_in_report: item.include_in_report,
            created_at: item.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedRow {
    pub id: String,
    pub process_id: String,
    pub process_name: String,
    pub number: u32,
    pub weight_per_item: Weight,
    pub weight: Weight,
    pub reason: String,
    pub include_in_report: bool,
    pub created_at: DateTime<Utc>,
}

impl RejectedRow {
    pub(crate) fn new(item: &RejectedItem, names: &ProcessNames) -> Self {
        Self {
            id: item.id.clone(),
            process_id: item.process_id.clone(),
            process_name: names.get(&item.process_id),
            number: item.count,
            weight_per_item: item.weight_per_item,
            weight: item.weight,
            reason: item.reason.clone(),
            include_in_report: item.include_in_report,
            created_at: item.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightLossRow {
    pub id: String,
    pub process_id: String,
    pub process_name: String,
    pub weight: Weight,
    pub weight_loss_per_rod: Weight,
    pub created_at: DateTime<Utc>,
}

impl WeightLossRow {
    pub(crate) fn new(item: &WeightLossItem, names: &ProcessNames) -> Self {
        Self {
            id: item.id.clone(),
            process_id: item.process_id.clone(),
            process_name: names.get(&item.process_id),
            weight: item.weight,
            weight_loss_per_rod: item.weight_loss_per_rod,
            created_at: item.created_at,
        }
    }
}
