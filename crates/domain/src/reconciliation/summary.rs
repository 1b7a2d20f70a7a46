use common::Weight;
use serde::Serialize;

use crate::process::{Process, ProcessError};

use super::ProcessOutputs;

/// Computed mass-conservation figures for one process.
///
/// `discrepancy` is `weight_used` minus the outputs excluding leftover; it
/// is negative when the outputs were over-counted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reconciliation {
    pub process_id: String,
    pub weight_used: Weight,
    pub finished_weight: Weight,
    pub non_conforming_weight: Weight,
    pub rejected_weight: Weight,
    pub weight_loss_weight: Weight,
    pub weight_loss_per_rod: Weight,
    pub weight_loss_declared: bool,
    pub leftover_weight: Weight,
    pub leftover_overridden: bool,
    pub total_accounted: Weight,
    pub discrepancy: Weight,
}

impl Reconciliation {
    /// Outputs without leftover.
    pub fn consumed(&self) -> Weight {
        self.finished_weight
            + self.non_conforming_weight
            + self.rejected_weight
            + self.weight_loss_weight
    }

    /// True when a weight-loss record should be written.
    pub fn has_weight_loss(&self) -> bool {
        self.weight_loss_declared || self.weight_loss_weight.is_positive()
    }

    /// True when the derived leftover absorbed over-counted outputs.
    pub fn was_clamped(&self) -> bool {
        !self.leftover_overridden && self.discrepancy.is_negative()
    }
}

/// Computes the reconciliation for a process without writing anything.
pub fn reconcile(process: &Process, outputs: &ProcessOutputs) -> Result<Reconciliation, ProcessError> {
    outputs.validate()?;

    let finished_weight = match &outputs.finished_goods {
        Some(f) => output_weight("finishedGoods", f.weight_per_item, f.count)?,
        None => Weight::zero(),
    };
    let non_conforming_weight = match &outputs.non_conforming {
        Some(n) => output_weight("nonConforming", n.weight_per_item, n.count)?,
        None => Weight::zero(),
    };
    let rejected_weight = match &outputs.rejected {
        Some(r) => output_weight("rejected", r.weight_per_item, r.count)?,
        None => Weight::zero(),
    };

    let declared_weight = outputs.weight_loss.as_ref().and_then(|w| w.weight);
    let weight_loss_per_rod = outputs
        .weight_loss
        .as_ref()
        .and_then(|w| w.weight_loss_per_rod)
        .unwrap_or(process.wastage_per_rod);
    let weight_loss_weight = match declared_weight {
        Some(weight) => weight,
        None => output_weight("weightLoss", weight_loss_per_rod, outputs.item_count())?,
    };

    let consumed = [non_conforming_weight, rejected_weight, weight_loss_weight]
        .into_iter()
        .try_fold(finished_weight, |acc, w| acc.checked_add(w))
        .ok_or_else(|| out_of_range("outputs", "total weight overflows"))?;
    let discrepancy = process
        .weight_used
        .checked_sub(consumed)
        .ok_or_else(|| out_of_range("outputs", "total weight overflows"))?;

    let leftover_weight = match outputs.leftover_weight {
        Some(leftover) => leftover,
        None => {
            if discrepancy.is_negative() {
                tracing::warn!(
                    process_id = %process.id,
                    weight_used = %process.weight_used,
                    consumed = %consumed,
                    discrepancy = %discrepancy,
                    "Outputs exceed weight used; leftover clamped to zero"
                );
            }
            discrepancy.clamp_non_negative()
        }
    };

    Ok(Reconciliation {
        process_id: process.id.clone(),
        weight_used: process.weight_used,
        finished_weight,
        non_conforming_weight,
        rejected_weight,
        weight_loss_weight,
        weight_loss_per_rod,
        weight_loss_declared: declared_weight.is_some(),
        leftover_weight,
        leftover_overridden: outputs.leftover_weight.is_some(),
        total_accounted: consumed
            .checked_add(leftover_weight)
            .ok_or_else(|| out_of_range("leftoverWeight", "total weight overflows"))?,
        discrepancy,
    })
}

/// `weight_per_item * count`, rejected when it does not fit a weight.
fn output_weight(
    field: &'static str,
    weight_per_item: Weight,
    count: u32,
) -> Result<Weight, ProcessError> {
    weight_per_item.checked_mul(count).ok_or_else(|| {
        out_of_range(field, &format!("{count} x {weight_per_item} overflows"))
    })
}

fn out_of_range(field: &'static str, value: &str) -> ProcessError {
    ProcessError::InvalidQuantity {
        field,
        value: value.to_string(),
    }
}
