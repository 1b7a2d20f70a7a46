use std::str::FromStr;

use chrono::{DateTime, Utc};
use common::{Diameter, RecordId, Weight};
use record_store::Collection;
use serde::{Deserialize, Serialize};

use crate::entity::Entity;

use super::{LedgerError, ProcessTag};

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    In,
    Out,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::In => "in",
            TransactionKind::Out => "out",
        }
    }
}

impl FromStr for TransactionKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "in" => Ok(TransactionKind::In),
            "out" => Ok(TransactionKind::Out),
            other => Err(LedgerError::InvalidQuantity {
                field: "type",
                value: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append-only record of one deposit or withdrawal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryTransaction {
    pub id: String,
    pub date: DateTime<Utc>,
    pub diameter: Diameter,
    pub weight: Weight,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<f64>,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_name: Option<String>,
}

impl InventoryTransaction {
    /// Creates a history line dated now.
    pub fn new(
        kind: TransactionKind,
        diameter: Diameter,
        weight: Weight,
        length: Option<f64>,
        tag: Option<&ProcessTag>,
    ) -> Self {
        Self {
            id: RecordId::new().to_string(),
            date: Utc::now(),
            diameter,
            weight,
            length,
            kind,
            process_id: tag.map(|t| t.process_id.clone()),
            process_name: tag.map(|t| t.process_name.clone()),
        }
    }
}

impl Entity for InventoryTransaction {
    const COLLECTION: Collection = Collection::InventoryHistory;

    fn key(&self) -> String {
        self.id.clone()
    }

    fn process_key(&self) -> Option<&str> {
        self.process_id.as_deref()
    }
}

/// Restricts a history listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryFilter {
    pub diameter: Option<Diameter>,
    pub kind: Option<TransactionKind>,
}

impl HistoryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diameter(mut self, diameter: Diameter) -> Self {
        self.diameter = Some(diameter);
        self
    }

    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn matches(&self, tx: &InventoryTransaction) -> bool {
        self.diameter.is_none_or(|d| tx.diameter == d) && self.kind.is_none_or(|k| tx.kind == k)
    }
}
