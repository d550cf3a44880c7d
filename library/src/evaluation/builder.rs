//! Forest construction: the root trunk plus `iteration_count` branching steps.

use std::sync::atomic::{AtomicBool, Ordering};

use log::debug;

use super::generator::{DEFAULT_PARALLEL_THRESHOLD, generate_children_cancellable};
use crate::model::forest::Forest;
use crate::model::geometry::{Line, Point3, Vector3};
use crate::model::parameters::{AngleUnit, BranchParameters};
use crate::util::timing::ScopedTimer;

/// Direction the trunk grows in from the origin.
pub const TRUNK_DIRECTION: Vector3 = Vector3::Y_AXIS;

/// Builds forests for a fixed angle convention and parallelism threshold.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForestBuilder {
    pub angle_unit: AngleUnit,
    pub parallel_threshold: usize,
}

impl Default for ForestBuilder {
    fn default() -> Self {
        Self {
            angle_unit: AngleUnit::Legacy,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl ForestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_angle_unit(mut self, angle_unit: AngleUnit) -> Self {
        self.angle_unit = angle_unit;
        self
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold.max(1);
        self
    }

    pub fn root(params: &BranchParameters) -> Line {
        Line::from_direction(Point3::ORIGIN, TRUNK_DIRECTION, params.trunk_length)
    }

    pub fn build(&self, params: &BranchParameters) -> Forest {
        let mut forest = Forest::from_root(Self::root(params));
        self.grow(&mut forest, params, None);
        forest
    }

    /// Like [`build`](Self::build) but gives up as soon as `cancel` is set.
    /// The flag is checked before every generation and between chunks of
    /// parents within one; a cancelled build returns `None` and the partial
    /// forest is dropped.
    pub fn build_cancellable(&self, params: &BranchParameters, cancel: &AtomicBool) -> Option<Forest> {
        let mut forest = Forest::from_root(Self::root(params));
        let finished = self.grow(&mut forest, params, Some(cancel));
        finished.then_some(forest)
    }

    fn grow(
        &self,
        forest: &mut Forest,
        params: &BranchParameters,
        cancel: Option<&AtomicBool>,
    ) -> bool {
        let is_cancelled = || cancel.is_some_and(|flag| flag.load(Ordering::Acquire));
        let iterations = params.iterations();
        let angle = params.angle_radians(self.angle_unit);
        let _timer = ScopedTimer::debug_lazy(|| format!("Forest build ({} iterations)", iterations));

        let mut parents = forest.segments().to_vec();
        for step in 0..iterations {
            if is_cancelled() {
                debug!("Forest build cancelled before generation {}", step + 1);
                return false;
            }
            let Some(children) = generate_children_cancellable(
                &parents,
                params.branch_scale,
                angle,
                self.parallel_threshold,
                cancel,
            ) else {
                debug!("Forest build cancelled during generation {}", step + 1);
                return false;
            };
            forest.push_generation(&children);
            parents = children;
        }
        !is_cancelled()
    }
}

/// Forest for the given inputs using the legacy `π / 100` angle unit.
pub fn build_forest(
    trunk_length: f64,
    branch_angle_degrees: f64,
    branch_scale: f64,
    iteration_count: i64,
) -> Forest {
    let params = BranchParameters::new(trunk_length, branch_angle_degrees, branch_scale, iteration_count);
    ForestBuilder::default().build(&params)
}
