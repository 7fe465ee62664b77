//! Affine transforms in pattern-local coordinates.
//!
//! Every symmetry candidate the analyzer tests and every motif placement
//! the generators perform is one of four shapes: rotation about a centre,
//! reflection across an axis through a centre, translation, or uniform
//! scaling about a centre. They are all stored as a 2D affine matrix so
//! they compose with a single multiplication.

use nalgebra::{Affine2, Matrix3, Point2};

use crate::geometry::Point;

/// A 2D affine transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    matrix: Affine2<f64>,
}

impl Transform {
    /// The identity transform.
    pub fn identity() -> Self {
        Self::from_parts(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    /// Translate by `(dx, dy)`.
    pub fn translation(dx: f64, dy: f64) -> Self {
        Self::from_parts(1.0, 0.0, 0.0, 1.0, dx, dy)
    }

    /// Rotate counter-clockwise (in the usual maths orientation) by
    /// `degrees` about `center`.
    pub fn rotation(center: Point, degrees: f64) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self::about(center, cos, -sin, sin, cos)
    }

    /// Reflect across the line through `center` at `axis_degrees` from the
    /// x axis.
    pub fn reflection(center: Point, axis_degrees: f64) -> Self {
        let (sin2, cos2) = (2.0 * axis_degrees.to_radians()).sin_cos();
        Self::about(center, cos2, sin2, sin2, -cos2)
    }

    /// Scale uniformly by `factor` about `center`.
    pub fn scale(center: Point, factor: f64) -> Self {
        Self::about(center, factor, 0.0, 0.0, factor)
    }

    /// Apply `self` first, then `next`.
    pub fn then(&self, next: &Transform) -> Transform {
        Transform { matrix: next.matrix * self.matrix }
    }

    /// The transform applied `n` times (`n = 0` is the identity).
    pub fn power(&self, n: usize) -> Transform {
        (0..n).fold(Transform::identity(), |acc, _| acc.then(self))
    }

    /// The inverse transform, if the matrix is invertible.
    pub fn inverse(&self) -> Option<Transform> {
        self.matrix.try_inverse().map(|matrix| Transform { matrix })
    }

    /// Map a point.
    #[inline]
    pub fn apply(&self, p: Point) -> Point {
        let q = self.matrix.transform_point(&Point2::new(p.x, p.y));
        Point::new(q.x, q.y)
    }

    /// Linear part `[a b; c d]` conjugated by a translation to `center`.
    fn about(center: Point, a: f64, b: f64, c: f64, d: f64) -> Self {
        let tx = center.x - (a * center.x + b * center.y);
        let ty = center.y - (c * center.x + d * center.y);
        Self::from_parts(a, b, c, d, tx, ty)
    }

    fn from_parts(a: f64, b: f64, c: f64, d: f64, tx: f64, ty: f64) -> Self {
        Self {
            matrix: Affine2::from_matrix_unchecked(Matrix3::new(
                a, b, tx,
                c, d, ty,
                0.0, 0.0, 1.0,
            )),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        a.distance(b) < 1e-9
    }

    #[test]
    fn rotation_quarter_turn() {
        let t = Transform::rotation(Point::new(50.0, 50.0), 90.0);
        assert!(close(t.apply(Point::new(30.0, 50.0)), Point::new(50.0, 30.0)));
    }

    #[test]
    fn reflection_across_diagonal_swaps_offsets() {
        let t = Transform::reflection(Point::new(0.0, 0.0), 45.0);
        assert!(close(t.apply(Point::new(3.0, 1.0)), Point::new(1.0, 3.0)));
    }

    #[test]
    fn reflection_is_an_involution() {
        let t = Transform::reflection(Point::new(5.0, -2.0), 30.0);
        let p = Point::new(7.5, 11.0);
        assert!(close(t.apply(t.apply(p)), p));
    }

    #[test]
    fn scale_about_center() {
        let t = Transform::scale(Point::new(10.0, 10.0), 2.0);
        assert!(close(t.apply(Point::new(11.0, 12.0)), Point::new(12.0, 14.0)));
    }

    #[test]
    fn power_and_inverse() {
        let t = Transform::rotation(Point::new(1.0, 2.0), 90.0);
        let p = Point::new(4.0, 6.0);
        assert!(close(t.power(4).apply(p), p));
        let inv = t.inverse().unwrap();
        assert!(close(inv.apply(t.apply(p)), p));
    }

    #[test]
    fn then_applies_in_order() {
        let t = Transform::translation(1.0, 0.0).then(&Transform::scale(Point::new(0.0, 0.0), 3.0));
        assert!(close(t.apply(Point::new(1.0, 1.0)), Point::new(6.0, 3.0)));
    }
}
