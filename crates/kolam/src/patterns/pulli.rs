//! Pulli (dot-grid) kolam.
//!
//! Every dot is wrapped in `iterations` nested rings; the seed decides
//! whether the rings are straight diamonds or rounded loops. On grids with
//! at least two rows and columns, each cell also gets a diamond that links
//! the midpoints of its four sides, tying neighbouring dots together.

use crate::error::GenerationError;
use crate::geometry::{Path, Point, Segment};
use crate::grid::GridSpec;
use crate::rng::Rng;

/// Outer ring radius as a fraction of the spacing.
const RING_FRACTION: f64 = 0.4;

pub(super) fn generate(
    grid: &GridSpec,
    iterations: usize,
    seed: u64,
) -> Result<Vec<Path>, GenerationError> {
    let mut rng = Rng::new(seed);
    let rounded = rng.next_index(2) == 1;
    let spacing = grid.spacing();

    let mut paths = Vec::new();
    for (_, _, dot) in grid.dots() {
        for i in 1..=iterations {
            let radius = RING_FRACTION * spacing * i as f64 / iterations as f64;
            paths.push(ring(dot, radius, rounded)?);
        }
    }

    if grid.rows() >= 2 && grid.cols() >= 2 {
        for r in 0..grid.rows() - 1 {
            for c in 0..grid.cols() - 1 {
                let top = grid.dot(r, c).lerp(grid.dot(r, c + 1), 0.5);
                let right = grid.dot(r, c + 1).lerp(grid.dot(r + 1, c + 1), 0.5);
                let bottom = grid.dot(r + 1, c).lerp(grid.dot(r + 1, c + 1), 0.5);
                let left = grid.dot(r, c).lerp(grid.dot(r + 1, c), 0.5);
                paths.push(polygon(&[top, right, bottom, left])?);
            }
        }
    }

    Ok(paths)
}

/// Closed ring through the four compass points at `radius` around `center`.
fn ring(center: Point, radius: f64, rounded: bool) -> Result<Path, GenerationError> {
    let n = Point::new(center.x, center.y - radius);
    let e = Point::new(center.x + radius, center.y);
    let s = Point::new(center.x, center.y + radius);
    let w = Point::new(center.x - radius, center.y);
    if !rounded {
        return polygon(&[n, e, s, w]);
    }

    let corner = |dx: f64, dy: f64| Point::new(center.x + dx * radius, center.y + dy * radius);
    let segments = [
        Segment::quadratic(n, corner(1.0, -1.0), e),
        Segment::quadratic(e, corner(1.0, 1.0), s),
        Segment::quadratic(s, corner(-1.0, 1.0), w),
        Segment::quadratic(w, corner(-1.0, -1.0), n),
    ];
    Ok(Path::from_segments(segments, true)?)
}

/// Closed straight-edged polygon through `corners`.
fn polygon(corners: &[Point]) -> Result<Path, GenerationError> {
    let segments = corners
        .iter()
        .zip(corners.iter().cycle().skip(1))
        .map(|(&a, &b)| Segment::line(a, b));
    Ok(Path::from_segments(segments, true)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::make_grid;

    #[test]
    fn rings_then_cell_diamonds() {
        let grid = make_grid(3, 4, 10.0).unwrap();
        let paths = generate(&grid, 2, 1).unwrap();
        // 12 dots x 2 rings, then 2 x 3 cells.
        assert_eq!(paths.len(), 24 + 6);
        assert!(paths.iter().all(|p| p.is_closed() && p.len() == 4));
    }

    #[test]
    fn single_row_has_no_cells() {
        let grid = make_grid(1, 5, 10.0).unwrap();
        assert_eq!(generate(&grid, 1, 0).unwrap().len(), 5);
    }

    #[test]
    fn outer_ring_radius() {
        let grid = make_grid(1, 1, 10.0).unwrap();
        let paths = generate(&grid, 3, 0).unwrap();
        let outer = paths[2].start().unwrap();
        assert!((outer.y + 4.0).abs() < 1e-12);
    }

    #[test]
    fn cell_diamond_links_side_midpoints() {
        let grid = make_grid(2, 2, 10.0).unwrap();
        let paths = generate(&grid, 1, 0).unwrap();
        let diamond = &paths[4];
        assert_eq!(diamond.start(), Some(Point::new(5.0, 0.0)));
        let bbox = diamond.bounding_box().unwrap();
        assert_eq!(bbox.min, Point::new(0.0, 0.0));
        assert_eq!(bbox.max, Point::new(10.0, 10.0));
    }

    #[test]
    fn seed_picks_ring_shape_for_whole_pattern() {
        let grid = make_grid(2, 2, 10.0).unwrap();
        let kinds = |seed| {
            let paths = generate(&grid, 2, seed).unwrap();
            paths[0].segments()[0].kind_name()
        };
        let found: Vec<_> = (0..16).map(kinds).collect();
        assert!(found.contains(&"line"));
        assert!(found.contains(&"quadratic"));
    }
}
