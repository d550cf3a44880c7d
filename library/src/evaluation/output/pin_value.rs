//! Typed data carried by component inputs and outputs.

use serde::{Deserialize, Serialize};

use crate::model::geometry::Line;

/// A value read from an input pin or written to an output pin.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub enum PinValue {
    /// Single floating-point number.
    Scalar(f64),
    /// Integer.
    Integer(i64),
    /// One line segment.
    Line(Line),
    /// A list of line segments (list access).
    Lines(Vec<Line>),
    /// No value / unconnected pin.
    None,
}

impl PinValue {
    pub fn is_none(&self) -> bool {
        matches!(self, PinValue::None)
    }

    /// Integers widen to scalars.
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            PinValue::Scalar(v) => Some(*v),
            PinValue::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }

    /// Scalars convert only when they hold a whole number.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            PinValue::Integer(v) => Some(*v),
            PinValue::Scalar(v) if v.is_finite() && v.fract() == 0.0 => Some(*v as i64),
            _ => None,
        }
    }

    pub fn as_lines(&self) -> Option<&[Line]> {
        match self {
            PinValue::Lines(lines) => Some(lines),
            PinValue::Line(line) => Some(std::slice::from_ref(line)),
            _ => None,
        }
    }
}

impl From<f64> for PinValue {
    fn from(v: f64) -> Self {
        PinValue::Scalar(v)
    }
}

impl From<i64> for PinValue {
    fn from(v: i64) -> Self {
        PinValue::Integer(v)
    }
}

impl From<Vec<Line>> for PinValue {
    fn from(lines: Vec<Line>) -> Self {
        PinValue::Lines(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_accepts_integer() {
        assert_eq!(PinValue::Integer(3).as_scalar(), Some(3.0));
        assert_eq!(PinValue::None.as_scalar(), None);
    }

    #[test]
    fn test_integer_rejects_fractional_scalar() {
        assert_eq!(PinValue::Scalar(4.0).as_integer(), Some(4));
        assert_eq!(PinValue::Scalar(4.5).as_integer(), None);
        assert_eq!(PinValue::Scalar(f64::NAN).as_integer(), None);
    }
}
