//! Padi (concentric) kolam.
//!
//! One base motif, picked by the seed, is repeated in `iterations` layers
//! around the grid centre. Layer `i` is the motif scaled by `1.3^i`, and
//! every layer has to fit inside the grid's extent.

use std::f64::consts::PI;

use crate::error::GenerationError;
use crate::geometry::{Path, Point, Segment};
use crate::grid::GridSpec;
use crate::rng::Rng;
use crate::transform::Transform;

/// Scale step between consecutive layers.
pub const LAYER_GROWTH: f64 = 1.3;

/// Slack for the extent check so the base layer can touch the boundary.
const FIT_EPS: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Motif {
    Diamond,
    Lotus,
    Star,
}

pub(super) fn generate(
    grid: &GridSpec,
    iterations: usize,
    seed: u64,
) -> Result<Vec<Path>, GenerationError> {
    let mut rng = Rng::new(seed);
    let motif = [Motif::Diamond, Motif::Lotus, Motif::Star][rng.next_index(3)];
    let base = motif_path(motif, grid.spacing() / 2.0)?;
    let center = grid.center();
    let extent = grid.extent();

    let mut layers = Vec::new();
    for layer in 0..iterations {
        let scale = LAYER_GROWTH.powi(layer as i32);
        let placed = base.transformed(
            &Transform::scale(Point::new(0.0, 0.0), scale)
                .then(&Transform::translation(center.x, center.y)),
        );
        let fits = placed
            .bounding_box()
            .is_some_and(|b| extent.contains_box(&b, FIT_EPS));
        if !fits {
            return Err(GenerationError::LayerOverflow { layer, scale });
        }
        layers.push(placed);
    }
    Ok(layers)
}

/// The base motif centred on the origin with outer radius `radius`.
fn motif_path(motif: Motif, radius: f64) -> Result<Path, GenerationError> {
    let n = Point::new(0.0, -radius);
    let e = Point::new(radius, 0.0);
    let s = Point::new(0.0, radius);
    let w = Point::new(-radius, 0.0);
    let segments: Vec<Segment> = match motif {
        Motif::Diamond => vec![
            Segment::line(n, e),
            Segment::line(e, s),
            Segment::line(s, w),
            Segment::line(w, n),
        ],
        Motif::Lotus => vec![
            Segment::quadratic(n, Point::new(radius, -radius), e),
            Segment::quadratic(e, Point::new(radius, radius), s),
            Segment::quadratic(s, Point::new(-radius, radius), w),
            Segment::quadratic(w, Point::new(-radius, -radius), n),
        ],
        Motif::Star => {
            // Alternate outer and inner points, starting due north.
            let points: Vec<Point> = (0..16)
                .map(|i| {
                    let r = if i % 2 == 0 { radius } else { radius * 0.5 };
                    let angle = -PI / 2.0 + i as f64 * PI / 8.0;
                    Point::new(r * angle.cos(), r * angle.sin())
                })
                .collect();
            points
                .iter()
                .zip(points.iter().cycle().skip(1))
                .map(|(&a, &b)| Segment::line(a, b))
                .collect()
        }
    };
    Ok(Path::from_segments(segments, true)?)
}
