//! One branching step: every parent segment sprouts two rotated children.

use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use crate::model::geometry::{Line, Transform};

/// Generations with at least this many parents are mapped on the rayon pool.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 16_384;
/// Parents branched between two looks at the cancel flag.
const CANCEL_CHUNK: usize = 4_096;

/// Children of `parents`, ordered `[A1, B1, A2, B2, ...]`.
///
/// Each child starts at its parent's end point, has the parent's length times
/// `scale`, and is the parent's tangent rotated by `+angle` (A) or `-angle`
/// (B) about world Z. Neither `scale` nor `angle` is range checked.
pub fn generate_children(parents: &[Line], scale: f64, angle: f64) -> Vec<Line> {
    generate_children_with_threshold(parents, scale, angle, DEFAULT_PARALLEL_THRESHOLD)
}

pub fn generate_children_with_threshold(
    parents: &[Line],
    scale: f64,
    angle: f64,
    parallel_threshold: usize,
) -> Vec<Line> {
    generate_children_cancellable(parents, scale, angle, parallel_threshold, None)
        .unwrap_or_default()
}

/// Like [`generate_children_with_threshold`], but looks at `cancel` before
/// every chunk of parents. Once the flag is seen the remaining chunks are
/// skipped and `None` is returned.
pub fn generate_children_cancellable(
    parents: &[Line],
    scale: f64,
    angle: f64,
    parallel_threshold: usize,
    cancel: Option<&AtomicBool>,
) -> Option<Vec<Line>> {
    let children: Vec<Line> = if parents.len() >= parallel_threshold {
        parents
            .par_chunks(CANCEL_CHUNK)
            .flat_map_iter(|chunk| {
                live_chunk(chunk, cancel)
                    .iter()
                    .flat_map(move |parent| branch_pair(parent, scale, angle))
            })
            .collect()
    } else {
        parents
            .chunks(CANCEL_CHUNK)
            .flat_map(|chunk| live_chunk(chunk, cancel))
            .flat_map(|parent| branch_pair(parent, scale, angle))
            .collect()
    };

    (!is_cancelled(cancel)).then_some(children)
}

fn is_cancelled(cancel: Option<&AtomicBool>) -> bool {
    cancel.is_some_and(|flag| flag.load(Ordering::Acquire))
}

/// The chunk, or nothing once cancellation was requested.
fn live_chunk<'a>(chunk: &'a [Line], cancel: Option<&AtomicBool>) -> &'a [Line] {
    if is_cancelled(cancel) { &[] } else { chunk }
}

fn branch_pair(parent: &Line, scale: f64, angle: f64) -> [Line; 2] {
    let origin = parent.to;
    let base = Line::from_direction(origin, parent.unit_tangent(), parent.length() * scale);
    [
        base.transformed(&Transform::rotation(angle, origin)),
        base.transformed(&Transform::rotation(-angle, origin)),
    ]
}
