use common::{LengthUnit, Weight};
use serde::{Deserialize, Serialize};

use crate::process::ProcessError;

/// Finished goods reported for a process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishedGoodInput {
    #[serde(alias = "number")]
    pub count: u32,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub height_unit: LengthUnit,
    pub weight_per_item: Weight,
}

/// Non-conforming items reported for a process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NonConformingInput {
    #[serde(alias = "number")]
    pub count: u32,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub height_unit: LengthUnit,
    pub weight_per_item: Weight,
    #[serde(default)]
    pub include_in_report: bool,
}

/// Rejected items reported for a process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectedInput {
    #[serde(alias = "number")]
    pub count: u32,
    pub weight_per_item: Weight,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub include_in_report: bool,
}

/// Weight loss reported for a process. Missing figures are derived.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightLossInput {
    #[serde(default)]
    pub weight: Option<Weight>,
    #[serde(default)]
    pub weight_loss_per_rod: Option<Weight>,
}

/// Everything reported when a process is finalized.
///
/// Each category is optional. `leftover_weight` overrides the derived
/// leftover.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessOutputs {
    #[serde(default)]
    pub finished_goods: Option<FinishedGoodInput>,
    #[serde(default)]
    pub non_conforming: Option<NonConformingInput>,
    #[serde(default)]
    pub rejected: Option<RejectedInput>,
    #[serde(default)]
    pub weight_loss: Option<WeightLossInput>,
    #[serde(default)]
    pub leftover_weight: Option<Weight>,
}

impl ProcessOutputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finished(mut self, count: u32, weight_per_item: Weight) -> Self {
        self.finished_goods = Some(FinishedGoodInput {
            count,
            height: 0.0,
            height_unit: LengthUnit::Millimetre,
            weight_per_item,
        });
        self
    }

    pub fn non_conforming(mut self, count: u32, weight_per_item: Weight) -> Self {
        self.non_conforming = Some(NonConformingInput {
            count,
            height: 0.0,
            height_unit: LengthUnit::Millimetre,
            weight_per_item,
            include_in_report: false,
        });
        self
    }

    pub fn rejected(mut self, count: u32, weight_per_item: Weight, reason: impl Into<String>) -> Self {
        self.rejected = Some(RejectedInput {
            count,
            weight_per_item,
            reason: reason.into(),
            include_in_report: false,
        });
        self
    }

    /// Declares the total weight loss.
    pub fn weight_loss(mut self, weight: Weight) -> Self {
        self.weight_loss.get_or_insert_with(WeightLossInput::default).weight = Some(weight);
        self
    }

    /// Declares the per-rod weight loss used to derive the total.
    pub fn weight_loss_per_rod(mut self, per_rod: Weight) -> Self {
        self.weight_loss
            .get_or_insert_with(WeightLossInput::default)
            .weight_loss_per_rod = Some(per_rod);
        self
    }

    pub fn leftover(mut self, weight: Weight) -> Self {
        self.leftover_weight = Some(weight);
        self
    }

    /// Total item count across finished, non-conforming and rejected.
    pub fn item_count(&self) -> u32 {
        self.finished_goods
            .as_ref()
            .map_or(0, |f| f.count)
            .saturating_add(self.non_conforming.as_ref().map_or(0, |n| n.count))
            .saturating_add(self.rejected.as_ref().map_or(0, |r| r.count))
    }

    /// Rejects negative weights and non-finite or negative heights.
    pub fn validate(&self) -> Result<(), ProcessError> {
        if let Some(f) = &self.finished_goods {
            check_weight("finishedGoods.weightPerItem", f.weight_per_item)?;
            check_length("finishedGoods.height", f.height)?;
        }
        if let Some(n) = &self.non_conforming {
            check_weight("nonConforming.weightPerItem", n.weight_per_item)?;
            check_length("nonConforming.height", n.height)?;
        }
        if let Some(r) = &self.rejected {
            check_weight("rejected.weightPerItem", r.weight_per_item)?;
        }
        if let Some(w) = &self.weight_loss {
            if let Some(weight) = w.weight {
                check_weight("weightLoss.weight", weight)?;
            }
            if let Some(per_rod) = w.weight_loss_per_rod {
                check_weight("weightLoss.weightLossPerRod", per_rod)?;
            }
        }
        if let Some(leftover) = self.leftover_weight {
            check_weight("leftoverWeight", leftover)?;
        }
        Ok(())
    }
}

fn check_weight(field: &'static str, weight: Weight) -> Result<(), ProcessError> {
    if weight.is_negative() {
        return Err(ProcessError::InvalidQuantity {
            field,
            value: weight.as_kg().to_string(),
        });
    }
    Ok(())
}

fn check_length(field: &'static str, length: f64) -> Result<(), ProcessError> {
    if !(length.is_finite() && length >= 0.0) {
        return Err(ProcessError::InvalidQuantity {
            field,
            value: length.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kg(v: f64) -> Weight {
        Weight::from_kg(v).unwrap()
    }

    #[test]
    fn item_count_sums_categories() {
        let outputs = ProcessOutputs::new()
            .finished(8, kg(1.0))
            .non_conforming(2, kg(1.0))
            .rejected(1, kg(1.0), "crack");
        assert_eq!(outputs.item_count(), 11);
        assert_eq!(ProcessOutputs::new().item_count(), 0);
    }

    #[test]
    fn negative_weights_are_rejected() {
        let outputs = ProcessOutputs::new().finished(1, kg(-1.0));
        assert!(matches!(
            outputs.validate(),
            Err(ProcessError::InvalidQuantity { field: "finishedGoods.weightPerItem", .. })
        ));

        let outputs = ProcessOutputs::new().leftover(kg(-0.5));
        assert!(outputs.validate().is_err());
    }

    #[test]
    fn non_finite_height_is_rejected() {
        let mut outputs = ProcessOutputs::new().finished(1, kg(1.0));
        if let Some(f) = outputs.finished_goods.as_mut() {
            f.height = f64::INFINITY;
        }
        assert!(outputs.validate().is_err());
    }

    #[test]
    fn deserializes_partial_outputs() {
        let outputs: ProcessOutputs = serde_json::from_value(serde_json::json!({
            "finishedGoods": { "number": 8, "weightPerItem": 1.0, "height": 5, "heightUnit": "cm" },
            "weightLoss": { "weight": 1.0 }
        }))
        .unwrap();

        let finished = outputs.finished_goods.as_ref().unwrap();
        assert_eq!(finished.count, 8);
        assert_eq!(finished.height_unit, LengthUnit::Centimetre);
        assert_eq!(outputs.weight_loss.as_ref().unwrap().weight, Some(kg(1.0)));
        assert!(outputs.rejected.is_none());
        assert!(outputs.leftover_weight.is_none());
    }
}
