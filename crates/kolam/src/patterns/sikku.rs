//! Sikku (continuous line) kolam.
//!
//! A seeded depth-first walk picks which dots the stroke weaves around.
//! Each picked dot gets a loop of four quadratic arcs joining the midpoints
//! between it and its four neighbours. Neighbouring loops share those
//! midpoints, so every vertex has even degree and the whole figure is one
//! connected graph: an Euler circuit exists and Hierholzer's algorithm
//! threads it into a single closed path.
//!
//! Vertices are addressed in half-spacing units so shared midpoints get
//! bit-identical coordinates no matter which loop produced them.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::error::GenerationError;
use crate::euler::{self, SegmentGraph};
use crate::geometry::{Path, Point, Segment};
use crate::grid::GridSpec;
use crate::rng::Rng;

/// Half-spacing lattice coordinates `(x, y)`.
type Key = (i64, i64);

pub(super) fn generate(
    grid: &GridSpec,
    iterations: usize,
    seed: u64,
) -> Result<Vec<Path>, GenerationError> {
    let dots = walk(grid, iterations, seed)?;
    let half = grid.spacing() / 2.0;

    let mut loops = LoopBuilder::new(half);
    for &(r, c) in &dots {
        loops.add_dot(r, c);
    }

    let path = loops.thread(iterations)?;

    // The circuit is rebuilt from the traversal; check the result itself.
    let strokes = std::slice::from_ref(&path);
    if euler::odd_degree_count(strokes) > 2 || !euler::is_single_stroke(strokes) {
        return Err(GenerationError::NonEulerianConstruction {
            requested: iterations,
            reachable: dots.len(),
        });
    }

    debug!(dots = dots.len(), segments = path.len(), "sikku stroke threaded");
    Ok(vec![path])
}

/// Depth-first walk from the centre dot visiting `iterations` dots.
///
/// Backtracks along the walk when the current dot has no unvisited
/// neighbour. Runs out only when every reachable dot is taken.
fn walk(
    grid: &GridSpec,
    iterations: usize,
    seed: u64,
) -> Result<Vec<(usize, usize)>, GenerationError> {
    let (rows, cols) = (grid.rows(), grid.cols());
    let mut rng = Rng::new(seed);
    let start = (rows / 2, cols / 2);

    let mut visited = vec![false; rows * cols];
    visited[start.0 * cols + start.1] = true;
    let mut order = vec![start];
    let mut stack = vec![start];

    while order.len() < iterations {
        let Some(&(r, c)) = stack.last() else {
            break;
        };
        let open: Vec<(usize, usize)> = neighbours(rows, cols, r, c)
            .into_iter()
            .flatten()
            .filter(|&(nr, nc)| !visited[nr * cols + nc])
            .collect();
        match rng.choose(&open) {
            Some(&next) => {
                visited[next.0 * cols + next.1] = true;
                order.push(next);
                stack.push(next);
            }
            None => {
                stack.pop();
            }
        }
    }

    if order.len() < iterations {
        return Err(GenerationError::NonEulerianConstruction {
            requested: iterations,
            reachable: order.len(),
        });
    }
    trace!(?order, "sikku walk");
    Ok(order)
}

/// 4-neighbours in N, E, S, W order.
fn neighbours(rows: usize, cols: usize, r: usize, c: usize) -> [Option<(usize, usize)>; 4] {
    [
        r.checked_sub(1).map(|nr| (nr, c)),
        (c + 1 < cols).then_some((r, c + 1)),
        (r + 1 < rows).then_some((r + 1, c)),
        c.checked_sub(1).map(|nc| (r, nc)),
    ]
}

/// Collects loop arcs as graph edges with their control points.
struct LoopBuilder {
    half: f64,
    ids: HashMap<Key, usize>,
    vertices: Vec<Point>,
    edges: Vec<(usize, usize)>,
    controls: Vec<Point>,
}

impl LoopBuilder {
    fn new(half: f64) -> Self {
        Self {
            half,
            ids: HashMap::new(),
            vertices: Vec::new(),
            edges: Vec::new(),
            controls: Vec::new(),
        }
    }

    fn point(&self, key: Key) -> Point {
        Point::new(key.0 as f64 * self.half, key.1 as f64 * self.half)
    }

    fn vertex(&mut self, key: Key) -> usize {
        if let Some(&id) = self.ids.get(&key) {
            return id;
        }
        let id = self.vertices.len();
        self.vertices.push(self.point(key));
        self.ids.insert(key, id);
        id
    }

    /// Four arcs N->E->S->W->N around dot `(r, c)`, each bowing out
    /// towards the cell corner between its endpoints.
    fn add_dot(&mut self, r: usize, c: usize) {
        let (x, y) = (2 * c as i64, 2 * r as i64);
        let n = (x, y - 1);
        let e = (x + 1, y);
        let s = (x, y + 1);
        let w = (x - 1, y);
        let arcs = [
            (n, e, (x + 1, y - 1)),
            (e, s, (x + 1, y + 1)),
            (s, w, (x - 1, y + 1)),
            (w, n, (x - 1, y - 1)),
        ];
        for (from, to, corner) in arcs {
            let a = self.vertex(from);
            let b = self.vertex(to);
            self.edges.push((a, b));
            let control = self.point(corner);
            self.controls.push(control);
        }
    }

    /// Walk every arc once and emit the closed stroke.
    fn thread(self, requested: usize) -> Result<Path, GenerationError> {
        let reachable = self.edges.len() / 4;
        let LoopBuilder { vertices, edges, controls, .. } = self;
        let graph = SegmentGraph::from_edges(vertices.clone(), edges.clone());
        let trail = graph
            .euler_trail()
            .ok_or(GenerationError::NonEulerianConstruction { requested, reachable })?;

        let segments = trail.into_iter().map(|step| {
            let (a, b) = edges[step.edge];
            let control = controls[step.edge];
            if step.forward {
                Segment::quadratic(vertices[a], control, vertices[b])
            } else {
                Segment::quadratic(vertices[b], control, vertices[a])
            }
        });
        Ok(Path::from_segments(segments, true)?)
    }
}
