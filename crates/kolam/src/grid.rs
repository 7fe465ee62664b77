//! The dot lattice every pattern is drawn on (the "pulli" grid).

use serde::{Deserialize, Serialize};

use crate::error::GeometryError;
use crate::geometry::{BoundingBox, Point};

/// Rows x cols of dots, `spacing` apart. Dot `(r, c)` sits at
/// `(c * spacing, r * spacing)`.
///
/// Fields are private so a `GridSpec` can only exist in a valid state;
/// deserialization goes through the same check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct GridSpec {
    rows: usize,
    cols: usize,
    spacing: f64,
}

impl GridSpec {
    /// Validating constructor.
    ///
    /// Fails with [`GeometryError::InvalidDimension`] if `rows < 1`,
    /// `cols < 1`, or `spacing` is not a positive finite number.
    pub fn new(rows: usize, cols: usize, spacing: f64) -> Result<Self, GeometryError> {
        if rows < 1 || cols < 1 || !(spacing > 0.0) || !spacing.is_finite() {
            return Err(GeometryError::InvalidDimension { rows, cols, spacing });
        }
        Ok(Self { rows, cols, spacing })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Total number of dots.
    pub fn dot_count(&self) -> usize {
        self.rows * self.cols
    }

    /// True when the grid has more than one dot along some axis.
    pub fn is_multi_cell(&self) -> bool {
        self.rows > 1 || self.cols > 1
    }

    /// Position of dot `(row, col)`.
    pub fn dot_at(&self, row: usize, col: usize) -> Result<Point, GeometryError> {
        if row >= self.rows || col >= self.cols {
            return Err(GeometryError::OutOfRange {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(self.dot(row, col))
    }

    /// Unchecked dot position for callers that iterate inside the grid.
    #[inline]
    pub(crate) fn dot(&self, row: usize, col: usize) -> Point {
        Point::new(col as f64 * self.spacing, row as f64 * self.spacing)
    }

    /// All dots in row-major order, with their indices.
    pub fn dots(&self) -> impl Iterator<Item = (usize, usize, Point)> + '_ {
        (0..self.rows).flat_map(move |r| (0..self.cols).map(move |c| (r, c, self.dot(r, c))))
    }

    /// Centre of the dot lattice.
    pub fn center(&self) -> Point {
        Point::new(
            (self.cols - 1) as f64 * self.spacing / 2.0,
            (self.rows - 1) as f64 * self.spacing / 2.0,
        )
    }

    /// The drawable area: the dot bounding box grown by half a spacing on
    /// every side, since strokes loop around the outermost dots.
    pub fn extent(&self) -> BoundingBox {
        let half = self.spacing / 2.0;
        BoundingBox {
            min: Point::new(-half, -half),
            max: Point::new(
                (self.cols - 1) as f64 * self.spacing + half,
                (self.rows - 1) as f64 * self.spacing + half,
            ),
        }
    }
}

/// Convenience free function matching the grid contract.
pub fn make_grid(rows: usize, cols: usize, spacing: f64) -> Result<GridSpec, GeometryError> {
    GridSpec::new(rows, cols, spacing)
}

#[derive(Deserialize)]
struct RawGrid {
    rows: usize,
    cols: usize,
    spacing: f64,
}

impl TryFrom<RawGrid> for GridSpec {
    type Error = GeometryError;

    fn try_from(raw: RawGrid) -> Result<Self, Self::Error> {
        GridSpec::new(raw.rows, raw.cols, raw.spacing)
    }
}
