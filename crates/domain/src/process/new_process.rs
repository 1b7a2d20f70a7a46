use chrono::Utc;
use common::{Diameter, LengthUnit, MassUnit, RecordId, Weight};
use serde::Deserialize;

use super::{Process, ProcessError, ProcessNumber, ProcessStatus};

fn default_wastage_unit() -> MassUnit {
    MassUnit::Gram
}

/// Input for creating a process.
///
/// `length_per_rod` and `total_length` are in `length_unit`;
/// `wastage_per_rod` is in `wastage_unit`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProcess {
    pub name: String,
    /// Uses the given process number instead of generating one.
    #[serde(default, rename = "processId")]
    pub process_number: Option<String>,
    pub diameter: Diameter,
    pub weight_used: Weight,
    pub blade_diameter: Diameter,
    #[serde(default)]
    pub total_length: Option<f64>,
    pub number_of_rods: u32,
    #[serde(default)]
    pub length_per_rod: f64,
    #[serde(default)]
    pub length_unit: LengthUnit,
    #[serde(default)]
    pub weight_per_rod: Weight,
    #[serde(default)]
    pub wastage_per_rod: f64,
    #[serde(default = "default_wastage_unit")]
    pub wastage_unit: MassUnit,
}

impl NewProcess {
    /// Creates an input with the required fields and zero per-rod figures.
    pub fn new(
        name: impl Into<String>,
        diameter: Diameter,
        weight_used: Weight,
        blade_diameter: Diameter,
        number_of_rods: u32,
    ) -> Self {
        Self {
            name: name.into(),
            process_number: None,
            diameter,
            weight_used,
            blade_diameter,
            total_length: None,
            number_of_rods,
            length_per_rod: 0.0,
            length_unit: LengthUnit::Millimetre,
            weight_per_rod: Weight::zero(),
            wastage_per_rod: 0.0,
            wastage_unit: MassUnit::Gram,
        }
    }

    pub fn with_length_per_rod(mut self, length: f64, unit: LengthUnit) -> Self {
        self.length_per_rod = length;
        self.length_unit = unit;
        self
    }

    pub fn with_total_length(mut self, length: f64) -> Self {
        self.total_length = Some(length);
        self
    }

    pub fn with_weight_per_rod(mut self, weight: Weight) -> Self {
        self.weight_per_rod = weight;
        self
    }

    pub fn with_wastage_per_rod(mut self, wastage: f64, unit: MassUnit) -> Self {
        self.wastage_per_rod = wastage;
        self.wastage_unit = unit;
        self
    }

    pub fn with_process_number(mut self, number: impl Into<String>) -> Self {
        self.process_number = Some(number.into());
        self
    }

    /// Validates the input and converts it into an in-progress process.
    ///
    /// Stock availability is checked by the ledger, not here.
    pub fn into_process(self) -> Result<Process, ProcessError> {
        if !self.weight_used.is_positive() {
            return Err(invalid("weightUsed", self.weight_used.as_kg()));
        }
        if self.number_of_rods == 0 {
            return Err(invalid("numberOfRods", 0.0));
        }
        if !self.diameter.is_positive() {
            return Err(invalid("diameter", self.diameter.as_mm()));
        }
        if !self.blade_diameter.is_positive() {
            return Err(invalid("bladeDiameter", self.blade_diameter.as_mm()));
        }
        if !is_non_negative(self.length_per_rod) {
            return Err(invalid("lengthPerRod", self.length_per_rod));
        }
        if self.weight_per_rod.is_negative() {
            return Err(invalid("weightPerRod", self.weight_per_rod.as_kg()));
        }
        if !is_non_negative(self.wastage_per_rod) {
            return Err(invalid("wastagePerRod", self.wastage_per_rod));
        }
        if let Some(total) = self.total_length
            && !is_non_negative(total)
        {
            return Err(invalid("totalLength", total));
        }

        let wastage_per_rod = Weight::from_unit(self.wastage_per_rod, self.wastage_unit)
            .map_err(|_| invalid("wastagePerRod", self.wastage_per_rod))?;
        let process_number = match self.process_number {
            Some(n) if !n.trim().is_empty() => ProcessNumber::from(n.trim().to_string()),
            _ => ProcessNumber::generate(),
        };

        Ok(Process {
            id: RecordId::new().to_string(),
            name: self.name.trim().to_string(),
            process_number,
            diameter: self.diameter,
            weight_used: self.weight_used,
            blade_diameter: self.blade_diameter,
            total_length: self.total_length.map(|l| self.length_unit.to_millimetres(l)),
            number_of_rods: self.number_of_rods,
            length_per_rod: self.length_unit.to_millimetres(self.length_per_rod),
            length_unit: self.length_unit,
            weight_per_rod: self.weight_per_rod,
            wastage_per_rod,
            wastage_unit: self.wastage_unit,
            created_at: Utc::now(),
            status: ProcessStatus::InProgress,
        })
    }
}

fn is_non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

fn invalid(field: &'static str, value: f64) -> ProcessError {
    ProcessError::InvalidQuantity {
        field,
        value: value.to_string(),
    }
}
