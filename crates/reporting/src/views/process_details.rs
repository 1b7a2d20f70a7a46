use chrono::{DateTime, Utc};
use common::{Diameter, Weight};
use domain::{
    FinishedGood, NonConformingItem, Process, ProcessStatus, ProcessSummary, RejectedItem,
    WeightLossItem,
};
use serde::Serialize;

/// One process joined with its outputs and summary.
///
/// `efficiency` is finished weight over weight used and `waste_percentage`
/// is weight loss plus rejected weight over weight used, both as
/// percentages rounded to two decimals and zero when no weight was used.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessDetails {
    pub id: String,
    pub process_id: String,
    pub process_name: String,
    pub status: ProcessStatus,
    pub diameter: Diameter,
    pub blade_diameter: Diameter,
    pub number_of_rods: u32,
    pub weight_used: Weight,
    pub created_at: DateTime<Utc>,
    pub finished_goods_count: u32,
    pub finished_goods_weight: Weight,
    pub non_conforming_count: u32,
    pub non_conforming_weight: Weight,
    pub rejected_count: u32,
    pub rejected_weight: Weight,
    pub total_weight_loss: Weight,
    pub remaining_weight: Weight,
    pub added_back_to_stock: bool,
    pub efficiency: f64,
    pub waste_percentage: f64,
}

/// Every output record loaded for a report.
#[derive(Debug, Clone, Default)]
pub(crate) struct Outputs {
    pub finished_goods: Vec<FinishedGood>,
    pub non_conforming: Vec<NonConformingItem>,
    pub rejected: Vec<RejectedItem>,
    pub weight_loss: Vec<WeightLossItem>,
    pub summaries: Vec<ProcessSummary>,
}

impl ProcessDetails {
    pub(crate) fn build(process: &Process, outputs: &Outputs) -> Self {
        let pid = process.id.as_str();

        let (finished_goods_count, finished_goods_weight) = totals(
            outputs
                .finished_goods
                .iter()
                .filter(|r| r.process_id == pid)
                .map(|r| (r.count, r.weight)),
        );
        let (non_conforming_count, non_conforming_weight) = totals(
            outputs
                .non_conforming
                .iter()
                .filter(|r| r.process_id == pid)
                .map(|r| (r.count, r.weight)),
        );
        let (rejected_count, rejected_weight) = totals(
            outputs
                .rejected
                .iter()
                .filter(|r| r.process_id == pid)
                .map(|r| (r.count, r.weight)),
        );
        let total_weight_loss: Weight = outputs
            .weight_loss
            .iter()
            .filter(|r| r.process_id == pid)
            .map(|r| r.weight)
            .sum();
        let summary = outputs.summaries.iter().find(|s| s.process_id == pid);

        Self {
            id: process.id.clone(),
            process_id: process.process_number.to_string(),
            process_name: process.name.clone(),
            status: process.status,
            diameter: process.diameter,
            blade_diameter: process.blade_diameter,
            number_of_rods: process.number_of_rods,
            weight_used: process.weight_used,
            created_at: process.created_at,
            finished_goods_count,
            finished_goods_weight,
            non_conforming_count,
            non_conforming_weight,
            rejected_count,
            rejected_weight,
            total_weight_loss,
            remaining_weight: summary.map_or(Weight::zero(), |s| s.remaining_weight),
            added_back_to_stock: summary.is_some_and(|s| s.added_back_to_stock),
            efficiency: round2(process.weight_used.percentage_of(finished_goods_weight)),
            waste_percentage: round2(
                process
                    .weight_used
                    .percentage_of(total_weight_loss + rejected_weight),
            ),
        }
    }
}

fn totals(items: impl Iterator<Item = (u32, Weight)>) -> (u32, Weight) {
    items.fold((0, Weight::zero()), |(count, weight), (c, w)| {
        (count.saturating_add(c), weight + w)
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::NewProcess;

    fn kg(v: f64) -> Weight {
        Weight::from_kg(v).unwrap()
    }

    fn process(weight_used: f64) -> Process {
        NewProcess::new(
            "Batch",
            Diameter::from_mm(12.0).unwrap(),
            kg(weight_used),
            Diameter::from_mm(3.0).unwrap(),
            8,
        )
        .into_process()
        .unwrap()
    }

    #[test]
    fn joins_outputs_of_the_process() {
        let p = process(12.0);
        let other = process(5.0);
        let outputs = Outputs {
            finished_goods: vec![
                FinishedGood::new(&p.id, 8, 10.0, kg(1.0)),
                FinishedGood::new(&other.id, 2, 10.0, kg(1.0)),
            ],
            rejected: vec![RejectedItem::new(&p.id, 1, kg(0.5), "crack".into(), false)],
            weight_loss: vec![WeightLossItem::new(&p.id, kg(1.0), Weight::zero())],
            ..Default::default()
        };

        let details = ProcessDetails::build(&p, &outputs);
        assert_eq!(details.finished_goods_count, 8);
        assert_eq!(details.finished_goods_weight, kg(8.0));
        assert_eq!(details.rejected_weight, kg(0.5));
        assert_eq!(details.total_weight_loss, kg(1.0));
        assert_eq!(details.efficiency, 66.67);
        assert_eq!(details.waste_percentage, 12.5);
        assert!(details.remaining_weight.is_zero());
        assert!(!details.added_back_to_stock);
    }

    #[test]
    fn percentages_are_zero_without_weight_used() {
        let mut p = process(1.0);
        p.weight_used = Weight::zero();

        let details = ProcessDetails::build(&p, &Outputs::default());
        assert_eq!(details.efficiency, 0.0);
        assert_eq!(details.waste_percentage, 0.0);
    }
}
