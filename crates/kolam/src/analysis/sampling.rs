//! Point sampling and nearest-edge lookup for coincidence tests.
//!
//! Every segment is sampled at `t = i / N` for `i = 0..=N`, and consecutive
//! samples of the same segment form a polyline edge. Two sample sets
//! coincide when every sample of each lies within the tolerance of some
//! edge of the other. Measuring against edges rather than samples keeps
//! the test independent of where along a curve the samples happen to land.

use std::collections::HashMap;

use crate::geometry::{BoundingBox, Point};
use crate::patterns::Pattern;
use crate::transform::Transform;

/// Sampled points of a pattern plus the polyline edges between them.
#[derive(Debug, Clone)]
pub(crate) struct Samples {
    points: Vec<Point>,
    edges: Vec<(usize, usize)>,
}

impl Samples {
    pub(crate) fn from_pattern(pattern: &Pattern, per_segment: usize) -> Self {
        let count = pattern.segment_count();
        let mut points = Vec::with_capacity(count * (per_segment + 1));
        let mut edges = Vec::with_capacity(count * per_segment);
        for (_, segment) in pattern.segments() {
            let first = points.len();
            points.extend((0..=per_segment).map(|i| segment.sample(i as f64 / per_segment as f64)));
            edges.extend((first..first + per_segment).map(|i| (i, i + 1)));
        }
        Self { points, edges }
    }

    pub(crate) fn points(&self) -> &[Point] {
        &self.points
    }

    /// Mean of all samples.
    pub(crate) fn centroid(&self) -> Option<Point> {
        if self.points.is_empty() {
            return None;
        }
        let n = self.points.len() as f64;
        let (sx, sy) = self
            .points
            .iter()
            .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
        Some(Point::new(sx / n, sy / n))
    }

    pub(crate) fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::around(self.points.iter().copied())
    }

    /// The same samples moved by `transform` (edges keep their topology).
    pub(crate) fn transformed(&self, transform: &Transform) -> Samples {
        Samples {
            points: self.points.iter().map(|&p| transform.apply(p)).collect(),
            edges: self.edges.clone(),
        }
    }

    pub(crate) fn index(&self, tolerance: f64) -> EdgeIndex {
        EdgeIndex::build(self, tolerance)
    }
}

/// Spatial hash of polyline edges.
///
/// Cells are at least as large as the longest edge, so an edge touches at
/// most four cells and a query only scans the cells its tolerance box
/// overlaps.
#[derive(Debug, Clone)]
pub(crate) struct EdgeIndex {
    cell: f64,
    edges: Vec<(Point, Point)>,
    grid: HashMap<(i64, i64), Vec<usize>>,
}

/// Convert a point to a grid cell coordinate.
#[inline]
fn point_to_cell(p: Point, cell: f64) -> (i64, i64) {
    ((p.x / cell).floor() as i64, (p.y / cell).floor() as i64)
}

impl EdgeIndex {
    fn build(samples: &Samples, tolerance: f64) -> Self {
        let edges: Vec<(Point, Point)> = samples
            .edges
            .iter()
            .map(|&(a, b)| (samples.points[a], samples.points[b]))
            .collect();
        let longest = edges.iter().map(|(a, b)| a.distance(*b)).fold(0.0, f64::max);
        let cell = longest.max(tolerance);

        let mut grid: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
        for (i, &(a, b)) in edges.iter().enumerate() {
            let (x0, y0) = point_to_cell(Point::new(a.x.min(b.x), a.y.min(b.y)), cell);
            let (x1, y1) = point_to_cell(Point::new(a.x.max(b.x), a.y.max(b.y)), cell);
            for cx in x0..=x1 {
                for cy in y0..=y1 {
                    grid.entry((cx, cy)).or_default().push(i);
                }
            }
        }
        Self { cell, edges, grid }
    }

    /// True if some edge passes within `eps` of `q`.
    pub(crate) fn near(&self, q: Point, eps: f64) -> bool {
        let (x0, y0) = point_to_cell(Point::new(q.x - eps, q.y - eps), self.cell);
        let (x1, y1) = point_to_cell(Point::new(q.x + eps, q.y + eps), self.cell);
        for cx in x0..=x1 {
            for cy in y0..=y1 {
                let Some(candidates) = self.grid.get(&(cx, cy)) else {
                    continue;
                };
                for &i in candidates {
                    let (a, b) = self.edges[i];
                    if distance_to_edge(q, a, b) <= eps {
                        return true;
                    }
                }
            }
        }
        false
    }
}

/// Distance from `p` to the segment `a`-`b`.
fn distance_to_edge(p: Point, a: Point, b: Point) -> f64 {
    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance(a.lerp(b, t))
}

/// Whether `transform` maps the sample set onto itself within `eps`.
pub(crate) fn maps_onto(samples: &Samples, index: &EdgeIndex, transform: &Transform, eps: f64) -> bool {
    let moved = samples.transformed(transform);
    if !moved.points.iter().all(|&p| index.near(p, eps)) {
        return false;
    }
    let moved_index = moved.index(eps);
    samples.points.iter().all(|&p| moved_index.near(p, eps))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Path, Segment};
    use crate::grid::make_grid;
    use crate::patterns::Style;

    fn line_pattern() -> Pattern {
        let path = Path::from_segments(
            [Segment::line(Point::new(0.0, 0.0), Point::new(10.0, 0.0))],
            false,
        )
        .unwrap();
        Pattern::new("line", make_grid(1, 1, 10.0).unwrap(), vec![path], Style::Kambi).unwrap()
    }

    #[test]
    fn samples_include_both_ends() {
        let samples = Samples::from_pattern(&line_pattern(), 4);
        assert_eq!(samples.points().len(), 5);
        assert_eq!(samples.points()[0], Point::new(0.0, 0.0));
        assert_eq!(samples.points()[4], Point::new(10.0, 0.0));
        assert_eq!(samples.centroid(), Some(Point::new(5.0, 0.0)));
    }

    #[test]
    fn edge_distance_ignores_sample_density() {
        let samples = Samples::from_pattern(&line_pattern(), 2);
        let index = samples.index(0.05);
        // Between samples, right on the line.
        assert!(index.near(Point::new(2.5, 0.0), 0.05));
        assert!(index.near(Point::new(7.3, 0.04), 0.05));
        assert!(!index.near(Point::new(5.0, 0.2), 0.05));
        assert!(!index.near(Point::new(10.2, 0.0), 0.05));
    }

    #[test]
    fn half_turn_maps_line_onto_itself() {
        let samples = Samples::from_pattern(&line_pattern(), 8);
        let index = samples.index(0.05);
        let centre = Point::new(5.0, 0.0);
        assert!(maps_onto(&samples, &index, &Transform::rotation(centre, 180.0), 0.05));
        assert!(!maps_onto(&samples, &index, &Transform::rotation(centre, 90.0), 0.05));
    }

    #[test]
    fn distance_to_degenerate_edge() {
        let a = Point::new(1.0, 1.0);
        assert_eq!(distance_to_edge(Point::new(4.0, 5.0), a, a), 5.0);
    }
}
