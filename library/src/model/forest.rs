use serde::{Deserialize, Serialize};

use crate::model::geometry::Line;

/// Every segment of a branching tree, root first, one generation after another.
///
/// Generation `k` holds exactly `2^k` segments and starts at index `2^k - 1`.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct Forest {
    segments: Vec<Line>,
    generations: usize,
}

impl Forest {
    pub fn from_root(root: Line) -> Self {
        Self {
            segments: vec![root],
            generations: 1,
        }
    }

    /// Append the next generation. Callers pass exactly twice the previous
    /// generation's size.
    pub(crate) fn push_generation(&mut self, generation: &[Line]) {
        debug_assert_eq!(generation.len(), 1usize << self.generations);
        self.segments.extend_from_slice(generation);
        self.generations += 1;
    }

    pub fn segments(&self) -> &[Line] {
        &self.segments
    }

    pub fn into_segments(self) -> Vec<Line> {
        self.segments
    }

    pub fn count(&self) -> usize {
        self.segments.len()
    }

    /// Number of generations, root included.
    pub fn generations(&self) -> usize {
        self.generations
    }

    pub fn generation(&self, index: usize) -> Option<&[Line]> {
        if index >= self.generations {
            return None;
        }
        let start = (1usize << index) - 1;
        self.segments.get(start..start + (1usize << index))
    }

    pub fn last_generation(&self) -> Option<&[Line]> {
        self.generations
            .checked_sub(1)
            .and_then(|index| self.generation(index))
    }
}

/// Segment count of a forest with `iterations` branching steps.
pub fn expected_count(iterations: usize) -> usize {
    (1usize << (iterations + 1)) - 1
}
