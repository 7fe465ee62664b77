//! Motif + transform decomposition.
//!
//! Works on whole segments: an operation is usable when it maps segments
//! onto segments of the pattern. Finite operations (rotation, reflection)
//! must permute the segment set. Repeating operations (translation, scale)
//! must split it into chains of one common length, which becomes the
//! operation's `copies`.
//!
//! The greedy loop keeps adding whichever candidate leaves the smallest
//! motif, as long as motif + operations still re-expand to exactly the
//! original segments. Ties go to the earlier candidate, and candidates are
//! listed rotation first, then reflection, translation, scale.

use std::collections::HashMap;
use std::iter;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::symmetry::SymmetryReport;
use crate::error::AnalysisError;
use crate::geometry::{Point, Segment, short};
use crate::patterns::{Pattern, SegmentRef};
use crate::transform::Transform;

/// Most scale ratios tried per pattern.
const MAX_SCALE_CANDIDATES: usize = 8;

/// One step of the reconstruction recipe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// `order` copies, each turned a further `degrees` about `center`.
    Rotation { center: Point, degrees: f64, order: u32 },
    /// The input plus its mirror image across the axis through `center`.
    Reflection { center: Point, axis_degrees: f64 },
    /// `copies` copies, each shifted a further `(dx, dy)`.
    Translation { dx: f64, dy: f64, copies: usize },
    /// `copies` copies, each scaled a further `factor` about `center`.
    Scale { center: Point, factor: f64, copies: usize },
}

impl Operation {
    /// The single-step transform.
    pub fn transform(&self) -> Transform {
        match *self {
            Operation::Rotation { center, degrees, .. } => Transform::rotation(center, degrees),
            Operation::Reflection { center, axis_degrees } => Transform::reflection(center, axis_degrees),
            Operation::Translation { dx, dy, .. } => Transform::translation(dx, dy),
            Operation::Scale { center, factor, .. } => Transform::scale(center, factor),
        }
    }

    /// Images produced per input, identity included.
    pub fn repetitions(&self) -> usize {
        match *self {
            Operation::Rotation { order, .. } => order as usize,
            Operation::Reflection { .. } => 2,
            Operation::Translation { copies, .. } | Operation::Scale { copies, .. } => copies,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Operation::Rotation { .. } => "rotation",
            Operation::Reflection { .. } => "reflection",
            Operation::Translation { .. } => "translation",
            Operation::Scale { .. } => "scale",
        }
    }

    /// One-line description for step listings and reports.
    pub fn describe(&self) -> String {
        match *self {
            Operation::Rotation { center, degrees, order } => format!(
                "rotate {order} times by {}° about ({}, {})",
                short(degrees),
                short(center.x),
                short(center.y)
            ),
            Operation::Reflection { center, axis_degrees } => format!(
                "mirror across the {}° axis through ({}, {})",
                short(axis_degrees),
                short(center.x),
                short(center.y)
            ),
            Operation::Translation { dx, dy, copies } => {
                format!("repeat {copies} times, shifting by ({}, {})", short(dx), short(dy))
            }
            Operation::Scale { center, factor, copies } => format!(
                "repeat {copies} times, scaling by {} about ({}, {})",
                short(factor),
                short(center.x),
                short(center.y)
            ),
        }
    }

    /// Position in the expansion order: translation, reflection, rotation, scale.
    fn expansion_rank(&self) -> u8 {
        match self {
            Operation::Translation { .. } => 0,
            Operation::Reflection { .. } => 1,
            Operation::Rotation { .. } => 2,
            Operation::Scale { .. } => 3,
        }
    }

    fn is_chain(&self) -> bool {
        matches!(self, Operation::Translation { .. } | Operation::Scale { .. })
    }

    fn with_copies(self, n: usize) -> Self {
        match self {
            Operation::Translation { dx, dy, .. } => Operation::Translation { dx, dy, copies: n },
            Operation::Scale { center, factor, .. } => Operation::Scale { center, factor, copies: n },
            other => other,
        }
    }
}

/// A motif (segments of the pattern) and the operations, in expansion
/// order, that regenerate the whole pattern from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decomposition {
    pub motif: Vec<SegmentRef>,
    pub operations: Vec<Operation>,
}

impl Decomposition {
    /// Re-run the recipe: motif segments through every operation in order.
    /// Near-duplicate images (within `eps`) are kept once.
    pub fn expand(&self, pattern: &Pattern, eps: f64) -> Vec<Segment> {
        let seeds = self.motif.iter().filter_map(|&at| pattern.segment(at).copied());
        expand(seeds, &self.operations, eps, usize::MAX)
            .map(|set| set.items)
            .unwrap_or_default()
    }

    /// True when the motif is the whole pattern.
    pub fn is_trivial(&self) -> bool {
        self.operations.is_empty()
    }
}

/// Segments keyed by curve midpoint for tolerant lookup.
///
/// Segments that are equal within `eps` have midpoints within `eps` of
/// each other, so scanning the 3x3 neighbourhood of `eps`-sized cells
/// finds every match.
#[derive(Debug, Clone)]
struct SegmentSet {
    eps: f64,
    items: Vec<Segment>,
    grid: HashMap<(i64, i64), Vec<usize>>,
}

impl SegmentSet {
    fn new(eps: f64) -> Self {
        Self { eps, items: Vec::new(), grid: HashMap::new() }
    }

    fn cell(&self, segment: &Segment) -> (i64, i64) {
        let m = segment.sample(0.5);
        ((m.x / self.eps).floor() as i64, (m.y / self.eps).floor() as i64)
    }

    /// Lowest index of an item matching `segment`.
    fn find(&self, segment: &Segment) -> Option<usize> {
        let (cx, cy) = self.cell(segment);
        let mut found: Option<usize> = None;
        for dx in -1..=1 {
            for dy in -1..=1 {
                let Some(candidates) = self.grid.get(&(cx + dx, cy + dy)) else {
                    continue;
                };
                for &i in candidates {
                    if self.items[i].approx_eq(segment, self.eps) {
                        found = Some(found.map_or(i, |f| f.min(i)));
                    }
                }
            }
        }
        found
    }

    /// Add `segment` unless a match is already present.
    fn insert(&mut self, segment: Segment) -> bool {
        if self.find(&segment).is_some() {
            return false;
        }
        let cell = self.cell(&segment);
        self.grid.entry(cell).or_default().push(self.items.len());
        self.items.push(segment);
        true
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

/// A usable operation together with where it sends each unit.
#[derive(Debug)]
struct Candidate {
    op: Operation,
    next: Vec<Option<usize>>,
    /// Steps from the head of the unit's chain (always 0 for finite ops).
    position: Vec<usize>,
}

fn evaluate(op: Operation, units: &SegmentSet) -> Option<Candidate> {
    let step = op.transform();
    let n = units.len();
    let next: Vec<Option<usize>> = units
        .items
        .iter()
        .map(|s| units.find(&s.transformed(&step)))
        .collect();

    if !op.is_chain() {
        let closed = next.iter().all(Option::is_some);
        return closed.then(|| Candidate { op, next, position: vec![0; n] });
    }

    let mut has_pre = vec![false; n];
    for &v in next.iter().flatten() {
        has_pre[v] = true;
    }
    let mut position = vec![usize::MAX; n];
    let mut copies: Option<usize> = None;
    for head in (0..n).filter(|&u| !has_pre[u]) {
        let mut len = 0;
        let mut cursor = Some(head);
        while let Some(u) = cursor {
            if position[u] != usize::MAX {
                return None;
            }
            position[u] = len;
            len += 1;
            cursor = next[u];
        }
        match copies {
            None => copies = Some(len),
            Some(c) if c != len => return None,
            Some(_) => {}
        }
    }
    // Units left unplaced sit on cycles, which a shift or growth cannot make.
    if position.contains(&usize::MAX) {
        return None;
    }
    let copies = copies.filter(|&c| c >= 2)?;
    Some(Candidate { op: op.with_copies(copies), next, position })
}

fn find_root(parent: &mut [usize], mut x: usize) -> usize {
    while parent[x] != x {
        parent[x] = parent[parent[x]];
        x = parent[x];
    }
    x
}

/// Orbit representatives under the picked operations.
///
/// Each orbit is represented by the unit that heads its chains (smallest
/// summed chain position), lowest index first on ties.
fn motif_of(picked: &[&Candidate], n: usize) -> Vec<usize> {
    let mut parent: Vec<usize> = (0..n).collect();
    for candidate in picked {
        for (u, v) in candidate.next.iter().enumerate() {
            if let Some(v) = *v {
                let (a, b) = (find_root(&mut parent, u), find_root(&mut parent, v));
                if a != b {
                    parent[a.max(b)] = a.min(b);
                }
            }
        }
    }

    let mut best: Vec<Option<(usize, usize)>> = vec![None; n];
    for u in 0..n {
        let key = (picked.iter().map(|c| c.position[u]).sum::<usize>(), u);
        let root = find_root(&mut parent, u);
        if best[root].is_none_or(|b| key < b) {
            best[root] = Some(key);
        }
    }
    let mut motif: Vec<usize> = best.into_iter().flatten().map(|(_, u)| u).collect();
    motif.sort_unstable();
    motif
}

/// Apply `operations` in order. Gives up (`None`) once more than `limit`
/// distinct segments appear.
fn expand<I>(seeds: I, operations: &[Operation], eps: f64, limit: usize) -> Option<SegmentSet>
where
    I: IntoIterator<Item = Segment>,
{
    let mut current = SegmentSet::new(eps);
    for s in seeds {
        current.insert(s);
    }
    for op in operations {
        let step = op.transform();
        let mut next = SegmentSet::new(eps);
        for s in &current.items {
            let mut image = *s;
            for _ in 0..op.repetitions() {
                next.insert(image);
                image = image.transformed(&step);
            }
            if next.len() > limit {
                return None;
            }
        }
        current = next;
    }
    Some(current)
}

fn reconstructs(units: &SegmentSet, motif: &[usize], operations: &[Operation]) -> bool {
    let seeds = motif.iter().map(|&u| units.items[u]);
    match expand(seeds, operations, units.eps, units.len()) {
        Some(expanded) => {
            expanded.len() == units.len() && expanded.items.iter().all(|s| units.find(s).is_some())
        }
        None => false,
    }
}

fn ordered_operations(picked: &[&Candidate]) -> Vec<Operation> {
    let mut ops: Vec<Operation> = picked.iter().map(|c| c.op).collect();
    ops.sort_by_key(Operation::expansion_rank);
    ops
}

/// Candidate operations in tie-break order.
fn candidate_operations(
    units: &SegmentSet,
    report: &SymmetryReport,
    orders: &[u32],
    centroid: Point,
) -> Vec<Operation> {
    let mut ops = Vec::new();
    for &k in orders.iter().rev() {
        ops.push(Operation::Rotation { center: centroid, degrees: 360.0 / k as f64, order: k });
    }
    for &axis in &report.reflection_axes {
        ops.push(Operation::Reflection { center: centroid, axis_degrees: axis });
    }
    if let Some(t) = report.translational {
        if t.dx != 0.0 {
            ops.push(Operation::Translation { dx: t.dx, dy: 0.0, copies: 0 });
        }
        if t.dy != 0.0 {
            ops.push(Operation::Translation { dx: 0.0, dy: t.dy, copies: 0 });
        }
    }
    for factor in scale_factors(units, centroid) {
        ops.push(Operation::Scale { center: centroid, factor, copies: 0 });
    }
    ops
}

/// Ratios between consecutive distinct distances of segment midpoints
/// from the centroid.
fn scale_factors(units: &SegmentSet, centroid: Point) -> Vec<f64> {
    let eps = units.eps;
    let mut radii: Vec<f64> = units
        .items
        .iter()
        .map(|s| s.sample(0.5).distance(centroid))
        .filter(|&r| r > eps)
        .collect();
    radii.sort_by(f64::total_cmp);
    radii.dedup_by(|a, b| (*a - *b).abs() <= eps);

    let mut factors: Vec<f64> = radii
        .windows(2)
        .map(|w| w[1] / w[0])
        .filter(|&f| f > 1.0 + 1e-6)
        .collect();
    factors.sort_by(f64::total_cmp);
    factors.dedup_by(|a, b| (*a - *b).abs() <= 1e-6);
    factors.truncate(MAX_SCALE_CANDIDATES);
    factors
}

pub(crate) fn decompose(
    pattern: &Pattern,
    report: &SymmetryReport,
    orders: &[u32],
    centroid: Point,
    eps: f64,
) -> Result<Decomposition, AnalysisError> {
    let mut units = SegmentSet::new(eps);
    let mut refs = Vec::new();
    for (at, segment) in pattern.segments() {
        if units.insert(*segment) {
            refs.push(at);
        }
    }
    let n = units.len();

    let candidates: Vec<Candidate> = candidate_operations(&units, report, orders, centroid)
        .into_par_iter()
        .filter_map(|op| evaluate(op, &units))
        .collect();
    trace!(usable = candidates.len(), "decomposition candidates");

    let mut chosen: Vec<usize> = Vec::new();
    let mut motif: Vec<usize> = (0..n).collect();
    loop {
        let trials: Vec<Option<(usize, Vec<usize>)>> = (0..candidates.len())
            .into_par_iter()
            .map(|ci| {
                if chosen.contains(&ci) {
                    return None;
                }
                let picked: Vec<&Candidate> = chosen
                    .iter()
                    .chain(iter::once(&ci))
                    .map(|&i| &candidates[i])
                    .collect();
                let trial = motif_of(&picked, n);
                if trial.len() >= motif.len() {
                    return None;
                }
                reconstructs(&units, &trial, &ordered_operations(&picked)).then_some((ci, trial))
            })
            .collect();

        match trials.into_iter().flatten().min_by_key(|(ci, m)| (m.len(), *ci)) {
            Some((ci, trial)) => {
                trace!(op = candidates[ci].op.kind_name(), motif = trial.len(), "operation added");
                chosen.push(ci);
                motif = trial;
            }
            None => break,
        }
    }

    let picked: Vec<&Candidate> = chosen.iter().map(|&i| &candidates[i]).collect();
    let operations = ordered_operations(&picked);
    if !reconstructs(&units, &motif, &operations) {
        return Err(AnalysisError::inconclusive(
            "motif and operations do not reconstruct the pattern",
        ));
    }

    debug!(
        segments = n,
        motif = motif.len(),
        operations = operations.len(),
        "decomposition chosen"
    );
    Ok(Decomposition {
        motif: motif.iter().map(|&u| refs[u]).collect(),
        operations,
    })
}
