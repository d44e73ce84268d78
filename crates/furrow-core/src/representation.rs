//! Numeric measurement values shared by the hierarchy view and the canonical model

use serde::{Deserialize, Serialize};

/// What a numeric value measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Representation {
    XOffset,
    YOffset,
    ZOffset,
    Width,
}

/// A measured value in canonical units (metres), tagged with its representation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericValue {
    pub value: f64,
    pub representation: Representation,
}

impl NumericValue {
    pub fn new(value: f64, representation: Representation) -> Self {
        Self {
            value,
            representation,
        }
    }

    /// Build from a raw wire value in integer millimetres
    pub fn from_millimeters(raw_mm: i32, representation: Representation) -> Self {
        Self {
            value: f64::from(raw_mm) / 1000.0,
            representation,
        }
    }
}

/// One geometry entry of a hierarchy node: the raw wire value in millimetres
/// plus the derived representation object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometryValue {
    pub raw_mm: i32,
    pub value: NumericValue,
}

impl GeometryValue {
    pub fn from_millimeters(raw_mm: i32, representation: Representation) -> Self {
        Self {
            raw_mm,
            value: NumericValue::from_millimeters(raw_mm, representation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_millimeter_conversion() {
        let value = NumericValue::from_millimeters(2500, Representation::Width);
        assert!((value.value - 2.5).abs() < f64::EPSILON);
        assert_eq!(value.representation, Representation::Width);
    }

    #[test]
    fn test_geometry_value_keeps_raw() {
        let geometry = GeometryValue::from_millimeters(-320, Representation::XOffset);
        assert_eq!(geometry.raw_mm, -320);
        assert!((geometry.value.value - (-0.32)).abs() < f64::EPSILON);
    }
}
