use record_store::WriteOp;

use crate::entity::Entity;
use crate::process::Process;

use super::{
    FinishedGood, LeftoverMaterial, NonConformingItem, ProcessOutputs, ProcessSummary,
    Reconciliation, RejectedItem, WeightLossItem,
};

/// The records a finalize writes, zero or one of each output category.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRecords {
    pub finished_good: Option<FinishedGood>,
    pub non_conforming: Option<NonConformingItem>,
    pub rejected: Option<RejectedItem>,
    pub weight_loss: Option<WeightLossItem>,
    pub summary: ProcessSummary,
    /// Present when leftover material goes back to stock.
    pub leftover: Option<LeftoverMaterial>,
}

impl OutputRecords {
    /// Builds the records from reported outputs and their reconciliation.
    pub fn build(
        process: &Process,
        outputs: &ProcessOutputs,
        reconciliation: &Reconciliation,
        add_leftover_to_stock: bool,
    ) -> Self {
        let pid = process.id.as_str();

        let finished_good = outputs.finished_goods.as_ref().map(|f| {
            FinishedGood::new(
                pid,
                f.count,
                f.height_unit.to_millimetres(f.height),
                f.weight_per_item,
            )
        });
        let non_conforming = outputs.non_conforming.as_ref().map(|n| {
            NonConformingItem::new(
                pid,
                n.count,
                n.height_unit.to_millimetres(n.height),
                n.weight_per_item,
                n.include_in_report,
            )
        });
        let rejected = outputs.rejected.as_ref().map(|r| {
            RejectedItem::new(
                pid,
                r.count,
                r.weight_per_item,
                r.reason.clone(),
                r.include_in_report,
            )
        });
        let weight_loss = reconciliation.has_weight_loss().then(|| {
            WeightLossItem::new(
                pid,
                reconciliation.weight_loss_weight,
                reconciliation.weight_loss_per_rod,
            )
        });

        let leftover = (add_leftover_to_stock && reconciliation.leftover_weight.is_positive())
            .then(|| LeftoverMaterial::new(pid, process.diameter, reconciliation.leftover_weight));

        let summary = ProcessSummary {
            id: common::RecordId::new().to_string(),
            process_id: pid.to_string(),
            total_weight_used: process.weight_used,
            total_weight_loss: reconciliation.weight_loss_weight,
            remaining_weight: reconciliation.leftover_weight,
            weight_loss_per_rod: reconciliation.weight_loss_per_rod,
            added_back_to_stock: add_leftover_to_stock,
            created_at: chrono::Utc::now(),
        };

        Self {
            finished_good,
            non_conforming,
            rejected,
            weight_loss,
            summary,
            leftover,
        }
    }

    /// Inserts for every record.
    pub fn write_ops(&self) -> Result<Vec<WriteOp>, serde_json::Error> {
        let mut ops = Vec::new();
        if let Some(r) = &self.finished_good {
            ops.push(WriteOp::Insert(r.to_record()?));
        }
        if let Some(r) = &self.non_conforming {
            ops.push(WriteOp::Insert(r.to_record()?));
        }
        if let Some(r) = &self.rejected {
            ops.push(WriteOp::Insert(r.to_record()?));
        }
        if let Some(r) = &self.weight_loss {
            ops.push(WriteOp::Insert(r.to_record()?));
        }
        ops.push(WriteOp::Insert(self.summary.to_record()?));
        if let Some(r) = &self.leftover {
            ops.push(WriteOp::Insert(r.to_record()?));
        }
        Ok(ops)
    }
}
