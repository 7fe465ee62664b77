//! Rotational, reflective and translational symmetry detection.
//!
//! Candidate checks are independent, so they run on the rayon pool and are
//! collected back in candidate order before reducing.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::sampling::{EdgeIndex, Samples, maps_onto};
use crate::geometry::Point;
use crate::transform::Transform;

/// Rotation orders tried, smallest first.
pub const ROTATION_ORDERS: [u32; 5] = [2, 3, 4, 6, 8];

/// Axes always tried, in degrees.
const BASE_AXES: [f64; 4] = [0.0, 45.0, 90.0, 135.0];

/// Fewest samples (as a fraction of all samples) that must take part in a
/// translation check for it to count.
const MIN_PARTICIPATION: f64 = 0.05;

/// Lattice repeat of a tileable pattern. A direction with no repeat is `0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    pub dx: f64,
    pub dy: f64,
}

/// What maps the pattern onto itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymmetryReport {
    /// Number of rotations (identity included) that map the pattern onto
    /// itself; 1 when none other does.
    pub rotational_order: u32,
    /// Reflection axes through the centroid, degrees in `[0, 180)`, ascending.
    pub reflection_axes: Vec<f64>,
    /// Minimal lattice repeat, for multi-cell grids.
    pub translational: Option<Translation>,
}

impl SymmetryReport {
    /// Cyclic (`C<k>`) or dihedral (`D<k>`) group name.
    pub fn group_name(&self) -> String {
        if self.reflection_axes.is_empty() {
            format!("C{}", self.rotational_order)
        } else {
            format!("D{}", self.rotational_order)
        }
    }

    /// True if anything besides the identity maps the pattern onto itself.
    pub fn has_symmetry(&self) -> bool {
        self.rotational_order > 1 || !self.reflection_axes.is_empty() || self.translational.is_some()
    }

    /// Short human-readable findings, one per detected symmetry.
    pub fn labels(&self) -> Vec<String> {
        let mut labels = Vec::new();
        if self.rotational_order > 1 {
            labels.push(format!("rotational order {}", self.rotational_order));
        }
        for axis in &self.reflection_axes {
            labels.push(format!("reflection across {axis}°"));
        }
        if let Some(t) = self.translational {
            labels.push(format!("translational repeat ({}, {})", t.dx, t.dy));
        }
        if labels.is_empty() {
            labels.push("no symmetry".to_string());
        }
        labels
    }
}

/// Every order in [`ROTATION_ORDERS`] whose rotation about `centroid`
/// maps the samples onto themselves, ascending.
pub(crate) fn rotation_orders(samples: &Samples, index: &EdgeIndex, centroid: Point, eps: f64) -> Vec<u32> {
    let results: Vec<(u32, bool)> = ROTATION_ORDERS
        .par_iter()
        .map(|&k| {
            let turn = Transform::rotation(centroid, 360.0 / k as f64);
            (k, maps_onto(samples, index, &turn, eps))
        })
        .collect();
    trace!(?results, "rotation candidates");
    results.into_iter().filter_map(|(k, ok)| ok.then_some(k)).collect()
}

/// Candidate axes: the fixed four plus every multiple of `90 / k` degrees
/// for each passing rotation order `k`. Sorted, duplicates removed.
pub(crate) fn axis_candidates(orders: &[u32]) -> Vec<f64> {
    let mut axes: Vec<f64> = BASE_AXES.to_vec();
    for &k in orders {
        let step = 90.0 / k as f64;
        let count = 2 * k as usize;
        axes.extend((0..count).map(|j| j as f64 * step));
    }
    axes.retain(|a| (0.0..180.0).contains(a));
    axes.sort_by(f64::total_cmp);
    axes.dedup_by(|a, b| (*a - *b).abs() < 1e-9);
    axes
}

/// Passing reflection axes through `centroid`, ascending.
pub(crate) fn reflection_axes(
    samples: &Samples,
    index: &EdgeIndex,
    centroid: Point,
    orders: &[u32],
    eps: f64,
) -> Vec<f64> {
    let results: Vec<(f64, bool)> = axis_candidates(orders)
        .into_par_iter()
        .map(|axis| (axis, maps_onto(samples, index, &Transform::reflection(centroid, axis), eps)))
        .collect();
    trace!(?results, "reflection candidates");
    results.into_iter().filter_map(|(a, ok)| ok.then_some(a)).collect()
}

/// Minimal horizontal and vertical repeat, in multiples of `spacing`.
///
/// A shift is checked only on the core of the pattern: the sample bounds
/// shrunk by half the shift on both ends of its axis. Within the core,
/// every sample whose shifted image (forwards or backwards) also lands in
/// the core must hit the original geometry.
pub(crate) fn translational_repeat(
    samples: &Samples,
    index: &EdgeIndex,
    spacing: f64,
    max_steps: (usize, usize),
    eps: f64,
) -> Option<Translation> {
    let dx = first_repeat(samples, index, max_steps.0, eps, |m| (m as f64 * spacing, 0.0));
    let dy = first_repeat(samples, index, max_steps.1, eps, |m| (0.0, m as f64 * spacing));
    trace!(?dx, ?dy, "translation candidates");
    match (dx, dy) {
        (None, None) => None,
        (dx, dy) => Some(Translation { dx: dx.unwrap_or(0.0), dy: dy.unwrap_or(0.0) }),
    }
}

fn first_repeat<F>(samples: &Samples, index: &EdgeIndex, steps: usize, eps: f64, shift: F) -> Option<f64>
where
    F: Fn(usize) -> (f64, f64) + Sync,
{
    let results: Vec<(f64, f64, bool)> = (1..steps)
        .into_par_iter()
        .map(|m| {
            let (dx, dy) = shift(m);
            (dx, dy, repeats_along(samples, index, dx, dy, eps))
        })
        .collect();
    results
        .into_iter()
        .find(|&(_, _, ok)| ok)
        .map(|(dx, dy, _)| if dx != 0.0 { dx } else { dy })
}

fn repeats_along(samples: &Samples, index: &EdgeIndex, dx: f64, dy: f64, eps: f64) -> bool {
    let Some(bounds) = samples.bounding_box() else {
        return false;
    };
    let horizontal = dx != 0.0;
    let margin = (if horizontal { dx.abs() } else { dy.abs() }) / 2.0;
    let (lo, hi) = if horizontal {
        (bounds.min.x + margin, bounds.max.x - margin)
    } else {
        (bounds.min.y + margin, bounds.max.y - margin)
    };
    if hi < lo {
        return false;
    }
    let in_core = |p: Point| {
        let v = if horizontal { p.x } else { p.y };
        v >= lo && v <= hi
    };

    let forward = Transform::translation(dx, dy);
    let backward = Transform::translation(-dx, -dy);
    let mut participating = 0usize;
    for &p in samples.points() {
        if !in_core(p) {
            continue;
        }
        let mut took_part = false;
        for shift in [&forward, &backward] {
            let q = shift.apply(p);
            if in_core(q) {
                if !index.near(q, eps) {
                    return false;
                }
                took_part = true;
            }
        }
        participating += usize::from(took_part);
    }
    participating as f64 >= MIN_PARTICIPATION * samples.points().len() as f64
}
