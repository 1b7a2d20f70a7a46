//! Report kinds and their fixed row schemas.

use std::str::FromStr;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ReportError, Result};

/// The reports the aggregator can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportKind {
    ProcessDetails,
    FinishedGoods,
    NonConforming,
    Rejected,
    WeightLoss,
}

impl ReportKind {
    pub const ALL: [ReportKind; 5] = [
        ReportKind::ProcessDetails,
        ReportKind::FinishedGoods,
        ReportKind::NonConforming,
        ReportKind::Rejected,
        ReportKind::WeightLoss,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::ProcessDetails => "process-details",
            ReportKind::FinishedGoods => "finished-goods",
            ReportKind::NonConforming => "non-conforming",
            ReportKind::Rejected => "rejected",
            ReportKind::WeightLoss => "weight-loss",
        }
    }

    /// The columns of every row, in output order.
    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            ReportKind::ProcessDetails => &[
                "id",
                "processId",
                "processName",
                "status",
                "diameter",
                "bladeDiameter",
                "numberOfRods",
                "weightUsed",
                "createdAt",
                "finishedGoodsCount",
                "finishedGoodsWeight",
                "nonConformingCount",
                "nonConformingWeight",
                "rejectedCount",
                "rejectedWeight",
                "totalWeightLoss",
                "remainingWeight",
                "addedBackToStock",
                "efficiency",
                "wastePercentage",
            ],
            ReportKind::FinishedGoods => &[
                "id",
                "processId",
                "processName",
                "number",
                "height",
                "weightPerItem",
                "weight",
                "createdAt",
            ],
            ReportKind::NonConforming => &[
                "id",
                "processId",
                "processName",
                "number",
                "height",
                "weightPerItem",
                "weight",
                "includeInReport",
                "createdAt",
            ],
            ReportKind::Rejected => &[
                "id",
                "processId",
                "processName",
                "number",
                "weightPerItem",
                "weight",
                "reason",
                "includeInReport",
                "createdAt",
            ],
            ReportKind::WeightLoss => &[
                "id",
                "processId",
                "processName",
                "weight",
                "weightLossPerRod",
                "createdAt",
            ],
        }
    }
}

impl FromStr for ReportKind {
    type Err = ReportError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ReportKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ReportError::UnknownReport(s.to_string()))
    }
}

impl std::fmt::Display for ReportKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A report: its kind, column list and rows.
///
/// Every row holds exactly the kind's fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub kind: ReportKind,
    pub fields: &'static [&'static str],
    pub rows: Vec<Map<String, Value>>,
}

impl Report {
    /// Serializes typed rows and projects them onto the kind's fields.
    ///
    /// Fields a row does not carry are written as `null`.
    pub fn from_rows<T: Serialize>(kind: ReportKind, rows: &[T]) -> Result<Self> {
        let fields = kind.fields();
        let rows = rows
            .iter()
            .map(|row| -> Result<Map<String, Value>> {
                let value = serde_json::to_value(row)?;
                Ok(fields
                    .iter()
                    .map(|f| (f.to_string(), value.get(*f).cloned().unwrap_or(Value::Null)))
                    .collect())
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { kind, fields, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
