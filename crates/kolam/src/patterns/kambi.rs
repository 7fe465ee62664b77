//! Kambi (freehand) kolam.
//!
//! A single leaf template (two cubic arcs meeting at the tips) is stamped
//! `iterations` times at seeded dots, each copy turned by a seeded multiple
//! of 45 degrees. Copies may overlap; there is no continuity rule across
//! leaves.

use crate::error::GenerationError;
use crate::geometry::{Path, Point, Segment};
use crate::grid::GridSpec;
use crate::rng::Rng;
use crate::transform::Transform;

/// Leaf half-length as a fraction of the spacing (tip to tip is 0.9x).
const LEAF_FRACTION: f64 = 0.45;

/// Unit leaf: tips at (-1, 0) and (1, 0), bulging 0.6 either side.
const LEAF: [Point; 6] = [
    Point::new(-1.0, 0.0),
    Point::new(-0.5, -0.8),
    Point::new(0.5, -0.8),
    Point::new(1.0, 0.0),
    Point::new(0.5, 0.8),
    Point::new(-0.5, 0.8),
];

pub(super) fn generate(
    grid: &GridSpec,
    iterations: usize,
    seed: u64,
) -> Result<Vec<Path>, GenerationError> {
    let mut rng = Rng::new(seed);
    let origin = Point::new(0.0, 0.0);
    let dots: Vec<Point> = grid.dots().map(|(_, _, p)| p).collect();

    let mut paths = Vec::new();
    for _ in 0..iterations {
        let Some(&dot) = rng.choose(&dots) else {
            break;
        };
        let degrees = rng.next_index(8) as f64 * 45.0;
        let placement = Transform::scale(origin, LEAF_FRACTION * grid.spacing())
            .then(&Transform::rotation(origin, degrees))
            .then(&Transform::translation(dot.x, dot.y));
        paths.push(leaf(&placement)?);
    }
    Ok(paths)
}

fn leaf(placement: &Transform) -> Result<Path, GenerationError> {
    let [tip, a1, a2, far, b1, b2] = LEAF.map(|p| placement.apply(p));
    let segments = [Segment::cubic(tip, a1, a2, far), Segment::cubic(far, b1, b2, tip)];
    Ok(Path::from_segments(segments, true)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::make_grid;

    #[test]
    fn one_leaf_per_iteration() {
        let grid = make_grid(4, 4, 20.0).unwrap();
        let paths = generate(&grid, 6, 11).unwrap();
        assert_eq!(paths.len(), 6);
        for path in &paths {
            assert!(path.is_closed());
            assert_eq!(path.len(), 2);
            assert!(path.segments().iter().all(|s| s.kind_name() == "cubic"));
        }
    }

    #[test]
    fn leaf_spans_nine_tenths_of_spacing() {
        let grid = make_grid(1, 1, 20.0).unwrap();
        let paths = generate(&grid, 1, 0).unwrap();
        let path = &paths[0];
        let tips = path.segments()[0].from().distance(path.segments()[0].to());
        assert!((tips - 18.0).abs() < 1e-9);
        // Centred on the only dot.
        let mid = path.segments()[0].from().lerp(path.segments()[0].to(), 0.5);
        assert!(mid.distance(Point::new(0.0, 0.0)) < 1e-9);
    }

    #[test]
    fn leaves_sit_on_grid_dots() {
        let grid = make_grid(3, 3, 10.0).unwrap();
        for path in generate(&grid, 5, 4).unwrap() {
            let s = path.segments()[0];
            let mid = s.from().lerp(s.to(), 0.5);
            let on_dot = grid.dots().any(|(_, _, d)| d.distance(mid) < 1e-9);
            assert!(on_dot, "leaf centre {mid:?} is off the grid");
        }
    }
}
