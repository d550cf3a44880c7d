use std::f64::consts::PI;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// How the branch angle input is turned into radians.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum AngleUnit {
    /// `π / 100` per input unit. This is what existing definitions were
    /// authored against, so it stays the default.
    #[default]
    Legacy,
    /// Standard degrees, `π / 180` per input unit.
    Degrees,
}

impl AngleUnit {
    pub fn to_radians(self, value: f64) -> f64 {
        match self {
            AngleUnit::Legacy => (PI / 100.0) * value,
            AngleUnit::Degrees => (PI / 180.0) * value,
        }
    }
}

/// Inputs for one forest evaluation. None of the ranges are validated.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub struct BranchParameters {
    pub trunk_length: f64,
    pub branch_angle_degrees: f64,
    pub branch_scale: f64,
    pub iteration_count: i64,
}

impl BranchParameters {
    pub fn new(
        trunk_length: f64,
        branch_angle_degrees: f64,
        branch_scale: f64,
        iteration_count: i64,
    ) -> Self {
        Self {
            trunk_length,
            branch_angle_degrees,
            branch_scale,
            iteration_count,
        }
    }

    /// Number of branching steps actually performed; negative counts run none.
    pub fn iterations(&self) -> usize {
        usize::try_from(self.iteration_count).unwrap_or(0)
    }

    pub fn angle_radians(&self, unit: AngleUnit) -> f64 {
        unit.to_radians(self.branch_angle_degrees)
    }

    pub fn key(&self, unit: AngleUnit) -> ForestKey {
        ForestKey {
            trunk_length: OrderedFloat(self.trunk_length),
            branch_angle: OrderedFloat(self.branch_angle_degrees),
            branch_scale: OrderedFloat(self.branch_scale),
            iterations: self.iterations(),
            angle_unit: unit,
        }
    }
}

/// Hashable identity of a forest: equal keys always build equal forests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ForestKey {
    trunk_length: OrderedFloat<f64>,
    branch_angle: OrderedFloat<f64>,
    branch_scale: OrderedFloat<f64>,
    iterations: usize,
    angle_unit: AngleUnit,
}
