//! Unit conversion and fixed-point quantities.
//!
//! Weights are held as whole milligrams and diameters as whole micrometres so
//! that ledger sums are exact. Both serialize as plain numbers in their
//! canonical unit (kilograms and millimetres).

use std::iter::Sum;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const MILLIGRAMS_PER_KG: f64 = 1_000_000.0;
const MICROMETRES_PER_MM: f64 = 1_000.0;

/// Largest magnitude accepted when converting from floating point.
const MAX_FIXED: f64 = 9.0e15;

/// Errors raised when converting raw numbers into unit types.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnitError {
    /// The value was NaN or infinite.
    #[error("{quantity} must be a finite number")]
    NotFinite { quantity: &'static str },

    /// The value does not fit the fixed-point representation.
    #[error("{quantity} is out of range: {value}")]
    OutOfRange { quantity: &'static str, value: f64 },

    /// The unit symbol is not recognised.
    #[error("Unknown unit: {0}")]
    UnknownUnit(String),
}

fn to_fixed(quantity: &'static str, value: f64, scale: f64) -> Result<i64, UnitError> {
    if !value.is_finite() {
        return Err(UnitError::NotFinite { quantity });
    }
    let scaled = (value * scale).round();
    if scaled.abs() > MAX_FIXED {
        return Err(UnitError::OutOfRange { quantity, value });
    }
    Ok(scaled as i64)
}

// ============================================================================
// Length
// ============================================================================

/// Unit a length was entered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LengthUnit {
    #[default]
    #[serde(rename = "mm")]
    Millimetre,
    #[serde(rename = "cm")]
    Centimetre,
    #[serde(rename = "m")]
    Metre,
}

impl LengthUnit {
    /// Converts a value in this unit to millimetres.
    pub fn to_millimetres(self, value: f64) -> f64 {
        match self {
            LengthUnit::Millimetre => value,
            LengthUnit::Centimetre => value * 10.0,
            LengthUnit::Metre => value * 1000.0,
        }
    }

    /// Converts a value in millimetres to this unit.
    pub fn from_millimetres(self, millimetres: f64) -> f64 {
        match self {
            LengthUnit::Millimetre => millimetres,
            LengthUnit::Centimetre => millimetres / 10.0,
            LengthUnit::Metre => millimetres / 1000.0,
        }
    }

    /// Returns the unit symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            LengthUnit::Millimetre => "mm",
            LengthUnit::Centimetre => "cm",
            LengthUnit::Metre => "m",
        }
    }
}

impl FromStr for LengthUnit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "mm" => Ok(LengthUnit::Millimetre),
            "cm" => Ok(LengthUnit::Centimetre),
            "m" => Ok(LengthUnit::Metre),
            other => Err(UnitError::UnknownUnit(other.to_string())),
        }
    }
}

impl std::fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Converts a length between two units.
pub fn convert_length(value: f64, from: LengthUnit, to: LengthUnit) -> f64 {
    to.from_millimetres(from.to_millimetres(value))
}

// ============================================================================
// Mass
// ============================================================================

/// Unit a mass was entered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MassUnit {
    #[serde(rename = "g")]
    Gram,
    #[default]
    #[serde(rename = "kg")]
    Kilogram,
}

impl MassUnit {
    /// Converts a value in this unit to kilograms.
    pub fn to_kilograms(self, value: f64) -> f64 {
        match self {
            MassUnit::Gram => value / 1000.0,
            MassUnit::Kilogram => value,
        }
    }

    /// Returns the unit symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            MassUnit::Gram => "g",
            MassUnit::Kilogram => "kg",
        }
    }
}

impl FromStr for MassUnit {
    type Err = UnitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "g" => Ok(MassUnit::Gram),
            "kg" => Ok(MassUnit::Kilogram),
            other => Err(UnitError::UnknownUnit(other.to_string())),
        }
    }
}

impl std::fmt::Display for MassUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

// ============================================================================
// Weight
// ============================================================================

/// A weight, stored in whole milligrams.
///
/// Serializes as a number of kilograms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Weight {
    milligrams: i64,
}

impl Weight {
    /// Returns zero weight.
    pub fn zero() -> Self {
        Self { milligrams: 0 }
    }

    /// Creates a weight from whole milligrams.
    pub fn from_milligrams(milligrams: i64) -> Self {
        Self { milligrams }
    }

    /// Creates a weight from kilograms, rounding to the nearest milligram.
    pub fn from_kg(kg: f64) -> Result<Self, UnitError> {
        to_fixed("weight", kg, MILLIGRAMS_PER_KG).map(Self::from_milligrams)
    }

    /// Creates a weight from a value in the given mass unit.
    pub fn from_unit(value: f64, unit: MassUnit) -> Result<Self, UnitError> {
        Self::from_kg(unit.to_kilograms(value))
    }

    /// Returns the weight in milligrams.
    pub fn milligrams(&self) -> i64 {
        self.milligrams
    }

    /// Returns the weight in kilograms.
    pub fn as_kg(&self) -> f64 {
        self.milligrams as f64 / MILLIGRAMS_PER_KG
    }

    /// Returns true if the weight is greater than zero.
    pub fn is_positive(&self) -> bool {
        self.milligrams > 0
    }

    /// Returns true if the weight is zero.
    pub fn is_zero(&self) -> bool {
        self.milligrams == 0
    }

    /// Returns true if the weight is below zero.
    pub fn is_negative(&self) -> bool {
        self.milligrams < 0
    }

    /// Multiplies by an item count, saturating at the numeric bounds.
    pub fn multiply(&self, count: u32) -> Weight {
        Weight {
            milligrams: self.milligrams.saturating_mul(i64::from(count)),
        }
    }

    /// Multiplies by an item count, or `None` on overflow.
    pub fn checked_mul(&self, count: u32) -> Option<Weight> {
        self.milligrams
            .checked_mul(i64::from(count))
            .map(Weight::from_milligrams)
    }

    /// Adds two weights, or `None` on overflow.
    pub fn checked_add(&self, rhs: Weight) -> Option<Weight> {
        self.milligrams
            .checked_add(rhs.milligrams)
            .map(Weight::from_milligrams)
    }

    /// Subtracts a weight, or `None` on overflow.
    pub fn checked_sub(&self, rhs: Weight) -> Option<Weight> {
        self.milligrams
            .checked_sub(rhs.milligrams)
            .map(Weight::from_milligrams)
    }

    /// Returns the larger of this weight and zero.
    pub fn clamp_non_negative(self) -> Weight {
        Weight {
            milligrams: self.milligrams.max(0),
        }
    }

    /// Returns `part / self` as a percentage, or zero when `self` is zero.
    pub fn percentage_of(&self, part: Weight) -> f64 {
        if self.milligrams == 0 {
            0.0
        } else {
            part.milligrams as f64 / self.milligrams as f64 * 100.0
        }
    }
}

impl TryFrom<f64> for Weight {
    type Error = UnitError;

    fn try_from(kg: f64) -> Result<Self, Self::Error> {
        Weight::from_kg(kg)
    }
}

impl From<Weight> for f64 {
    fn from(weight: Weight) -> Self {
        weight.as_kg()
    }
}

impl std::fmt::Display for Weight {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3} kg", self.as_kg())
    }
}

// Operators saturate; use the checked methods where overflow must be reported.

impl std::ops::Add for Weight {
    type Output = Weight;

    fn add(self, rhs: Self) -> Self::Output {
        Weight {
            milligrams: self.milligrams.saturating_add(rhs.milligrams),
        }
    }
}

impl std::ops::Sub for Weight {
    type Output = Weight;

    fn sub(self, rhs: Self) -> Self::Output {
        Weight {
            milligrams: self.milligrams.saturating_sub(rhs.milligrams),
        }
    }
}

impl std::ops::AddAssign for Weight {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::ops::SubAssign for Weight {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Sum for Weight {
    fn sum<I: Iterator<Item = Weight>>(iter: I) -> Self {
        iter.fold(Weight::zero(), |acc, w| acc + w)
    }
}

impl<'a> Sum<&'a Weight> for Weight {
    fn sum<I: Iterator<Item = &'a Weight>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// ============================================================================
// Diameter
// ============================================================================

/// A rod or blade diameter, stored in whole micrometres.
///
/// Serializes as a number of millimetres. Equality and hashing are exact,
/// so diameters can key stock lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Diameter {
    micrometres: i64,
}

impl Diameter {
    /// Creates a diameter from millimetres, rounding to the nearest micrometre.
    pub fn from_mm(mm: f64) -> Result<Self, UnitError> {
        to_fixed("diameter", mm, MICROMETRES_PER_MM).map(|micrometres| Self { micrometres })
    }

    /// Returns the diameter in millimetres.
    pub fn as_mm(&self) -> f64 {
        self.micrometres as f64 / MICROMETRES_PER_MM
    }

    /// Returns true if the diameter is greater than zero.
    pub fn is_positive(&self) -> bool {
        self.micrometres > 0
    }

    /// Returns the catalogue key for this diameter (millimetres, shortest form).
    pub fn key(&self) -> String {
        self.as_mm().to_string()
    }
}

impl TryFrom<f64> for Diameter {
    type Error = UnitError;

    fn try_from(mm: f64) -> Result<Self, Self::Error> {
        Diameter::from_mm(mm)
    }
}

impl From<Diameter> for f64 {
    fn from(diameter: Diameter) -> Self {
        diameter.as_mm()
    }
}

impl std::fmt::Display for Diameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}mm", self.as_mm())
    }
}
