use chrono::{DateTime, Utc};
use common::{Diameter, LengthUnit, MassUnit, Weight};
use record_store::Collection;
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::ledger::ProcessTag;

use super::{ProcessError, ProcessNumber, ProcessStatus};

/// One manufacturing run that reserved stock at creation.
///
/// Lengths are stored in millimetres and wastage in kilograms; the units the
/// operator entered are kept for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Process {
    pub id: String,
    pub name: String,
    #[serde(rename = "processId")]
    pub process_number: ProcessNumber,
    pub diameter: Diameter,
    pub weight_used: Weight,
    pub blade_diameter: Diameter,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_length: Option<f64>,
    pub number_of_rods: u32,
    pub length_per_rod: f64,
    pub length_unit: LengthUnit,
    pub weight_per_rod: Weight,
    pub wastage_per_rod: Weight,
    pub wastage_unit: MassUnit,
    pub created_at: DateTime<Utc>,
    pub status: ProcessStatus,
}

impl Process {
    /// Returns the tag that attributes ledger lines to this process.
    pub fn tag(&self) -> ProcessTag {
        ProcessTag::new(self.id.clone(), self.name.clone())
    }

    /// Fails with `InvalidState` unless the process can be completed.
    pub fn ensure_can_complete(&self) -> Result<(), ProcessError> {
        if self.status.can_complete() {
            Ok(())
        } else {
            Err(ProcessError::InvalidState {
                process_id: self.id.clone(),
                status: self.status,
                action: "complete",
            })
        }
    }

    /// Transitions to `completed`.
    pub fn complete(&mut self) -> Result<(), ProcessError> {
        self.ensure_can_complete()?;
        self.status = ProcessStatus::Completed;
        Ok(())
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == ProcessStatus::InProgress
    }
}

impl Entity for Process {
    const COLLECTION: Collection = Collection::Processes;

    fn key(&self) -> String {
        self.id.clone()
    }
}
