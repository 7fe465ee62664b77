//! Core geometry types for kolam patterns.
//!
//! ## Rust Lesson #3: Structs & Derives
//!
//! In JS you'd write: `const point = { x: 1.0, y: 2.0 }`
//! In Rust, we define a `struct` with explicit types.
//!
//! The `#[derive(...)]` macro auto-generates common functionality:
//! - `Debug` = like console.log, lets you print with `{:?}`
//! - `Clone` = can duplicate the value (like spread: `{...obj}`)
//! - `Copy` = can copy implicitly (small stack values only)
//! - `PartialEq` = can compare with `==`
//! - `Serialize`/`Deserialize` = serde can turn it into JSON and back

use lyon_geom::{CubicBezierSegment, QuadraticBezierSegment, point};
use serde::{Deserialize, Serialize};

use crate::error::GeometryError;
use crate::transform::Transform;

/// A 2D point in pattern-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// One drawing primitive. Every variant carries its own endpoints, so a
/// segment never depends on a "current point" left over from the previous
/// one.
///
/// ## Rust Lesson #8: Enums with Data
///
/// A Rust `enum` is a tagged union: each variant can hold different
/// fields, and `match` forces you to handle every variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    Line {
        from: Point,
        to: Point,
    },
    QuadraticBezier {
        from: Point,
        control: Point,
        to: Point,
    },
    CubicBezier {
        from: Point,
        c1: Point,
        c2: Point,
        to: Point,
    },
}

/// An ordered run of segments where each segment starts where the previous
/// one ended.
///
/// Fields are private: the only ways to build a `Path` go through
/// [`Path::append_segment`] / [`Path::push`], which enforce continuity.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawPath")]
pub struct Path {
    segments: Vec<Segment>,
    closed: bool,
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Point,
    pub max: Point,
}

// ============================================================================
// IMPLEMENTATIONS (methods)
// ============================================================================

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance to another point.
    #[inline]
    pub fn distance(&self, other: Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Linear interpolation towards `other`.
    #[inline]
    pub fn lerp(&self, other: Point, t: f64) -> Point {
        Point::new(self.x + (other.x - self.x) * t, self.y + (other.y - self.y) * t)
    }
}

impl Segment {
    #[inline]
    pub fn line(from: Point, to: Point) -> Self {
        Segment::Line { from, to }
    }

    #[inline]
    pub fn quadratic(from: Point, control: Point, to: Point) -> Self {
        Segment::QuadraticBezier { from, control, to }
    }

    #[inline]
    pub fn cubic(from: Point, c1: Point, c2: Point, to: Point) -> Self {
        Segment::CubicBezier { from, c1, c2, to }
    }

    /// Start point.
    #[inline]
    pub fn from(&self) -> Point {
        match *self {
            Segment::Line { from, .. }
            | Segment::QuadraticBezier { from, .. }
            | Segment::CubicBezier { from, .. } => from,
        }
    }

    /// End point.
    #[inline]
    pub fn to(&self) -> Point {
        match *self {
            Segment::Line { to, .. }
            | Segment::QuadraticBezier { to, .. }
            | Segment::CubicBezier { to, .. } => to,
        }
    }

    /// Short name of the primitive ("line", "quadratic", "cubic").
    pub fn kind_name(&self) -> &'static str {
        match self {
            Segment::Line { .. } => "line",
            Segment::QuadraticBezier { .. } => "quadratic",
            Segment::CubicBezier { .. } => "cubic",
        }
    }

    /// Evaluate the curve at parameter `t` (clamped to `[0, 1]`).
    ///
    /// Lines interpolate linearly; the Bézier variants use the Bernstein
    /// basis (via lyon_geom).
    pub fn sample(&self, t: f64) -> Point {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Segment::Line { from, to } => from.lerp(to, t),
            Segment::QuadraticBezier { from, control, to } => {
                let p = QuadraticBezierSegment {
                    from: point(from.x, from.y),
                    ctrl: point(control.x, control.y),
                    to: point(to.x, to.y),
                }
                .sample(t);
                Point::new(p.x, p.y)
            }
            Segment::CubicBezier { from, c1, c2, to } => {
                let p = CubicBezierSegment {
                    from: point(from.x, from.y),
                    ctrl1: point(c1.x, c1.y),
                    ctrl2: point(c2.x, c2.y),
                    to: point(to.x, to.y),
                }
                .sample(t);
                Point::new(p.x, p.y)
            }
        }
    }

    /// The same curve traversed in the opposite direction.
    pub fn reversed(&self) -> Segment {
        match *self {
            Segment::Line { from, to } => Segment::Line { from: to, to: from },
            Segment::QuadraticBezier { from, control, to } => {
                Segment::QuadraticBezier { from: to, control, to: from }
            }
            Segment::CubicBezier { from, c1, c2, to } => Segment::CubicBezier {
                from: to,
                c1: c2,
                c2: c1,
                to: from,
            },
        }
    }

    /// Apply `f` to every defining point (endpoints and controls).
    pub fn map_points<F>(&self, mut f: F) -> Segment
    where
        F: FnMut(Point) -> Point,
    {
        match *self {
            Segment::Line { from, to } => Segment::Line { from: f(from), to: f(to) },
            Segment::QuadraticBezier { from, control, to } => Segment::QuadraticBezier {
                from: f(from),
                control: f(control),
                to: f(to),
            },
            Segment::CubicBezier { from, c1, c2, to } => Segment::CubicBezier {
                from: f(from),
                c1: f(c1),
                c2: f(c2),
                to: f(to),
            },
        }
    }

    /// Affine maps send Bézier control polygons to control polygons, so
    /// transforming the defining points transforms the curve exactly.
    pub fn transformed(&self, transform: &Transform) -> Segment {
        self.map_points(|p| transform.apply(p))
    }

    /// Visit every defining point in order.
    pub fn for_each_point<F: FnMut(Point)>(&self, mut f: F) {
        self.map_points(|p| {
            f(p);
            p
        });
    }

    pub fn is_finite(&self) -> bool {
        let mut finite = true;
        self.for_each_point(|p| finite &= p.is_finite());
        finite
    }

    /// Geometric equality within `eps`, in either direction of travel.
    pub fn approx_eq(&self, other: &Segment, eps: f64) -> bool {
        self.same_direction(other, eps) || self.same_direction(&other.reversed(), eps)
    }

    fn same_direction(&self, other: &Segment, eps: f64) -> bool {
        let near = |a: Point, b: Point| a.distance(b) <= eps;
        match (*self, *other) {
            (Segment::Line { from: a0, to: a1 }, Segment::Line { from: b0, to: b1 }) => {
                near(a0, b0) && near(a1, b1)
            }
            (
                Segment::QuadraticBezier { from: a0, control: a1, to: a2 },
                Segment::QuadraticBezier { from: b0, control: b1, to: b2 },
            ) => near(a0, b0) && near(a1, b1) && near(a2, b2),
            (
                Segment::CubicBezier { from: a0, c1: a1, c2: a2, to: a3 },
                Segment::CubicBezier { from: b0, c1: b1, c2: b2, to: b3 },
            ) => near(a0, b0) && near(a1, b1) && near(a2, b2) && near(a3, b3),
            _ => false,
        }
    }

    /// Tight bounds of the curve itself (not its control polygon).
    pub fn bounding_box(&self) -> BoundingBox {
        match *self {
            Segment::Line { from, to } => BoundingBox::from_points(from, to),
            Segment::QuadraticBezier { from, control, to } => {
                let b = QuadraticBezierSegment {
                    from: point(from.x, from.y),
                    ctrl: point(control.x, control.y),
                    to: point(to.x, to.y),
                }
                .bounding_box();
                BoundingBox::from_points(Point::new(b.min.x, b.min.y), Point::new(b.max.x, b.max.y))
            }
            Segment::CubicBezier { from, c1, c2, to } => {
                let b = CubicBezierSegment {
                    from: point(from.x, from.y),
                    ctrl1: point(c1.x, c1.y),
                    ctrl2: point(c2.x, c2.y),
                    to: point(to.x, to.y),
                }
                .bounding_box();
                BoundingBox::from_points(Point::new(b.min.x, b.min.y), Point::new(b.max.x, b.max.y))
            }
        }
    }
}

impl Path {
    /// An empty, open path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a path from segments, checking continuity, then optionally
    /// close it.
    pub fn from_segments<I>(segments: I, closed: bool) -> Result<Self, GeometryError>
    where
        I: IntoIterator<Item = Segment>,
    {
        let mut path = Path::new();
        for segment in segments {
            path.push(segment)?;
        }
        if closed { path.close_path() } else { Ok(path) }
    }

    /// Consume the path and return it with `segment` appended.
    ///
    /// Fails with [`GeometryError::Discontinuity`] unless the segment starts
    /// exactly where the path ends (any segment may start an empty path).
    pub fn append_segment(mut self, segment: Segment) -> Result<Self, GeometryError> {
        self.push(segment)?;
        Ok(self)
    }

    /// In-place form of [`Path::append_segment`].
    pub fn push(&mut self, segment: Segment) -> Result<(), GeometryError> {
        if self.closed {
            return Err(GeometryError::AlreadyClosed);
        }
        if !segment.is_finite() {
            return Err(GeometryError::NonFinite("segment"));
        }
        if let Some(end) = self.end() {
            let start = segment.from();
            if start != end {
                return Err(GeometryError::Discontinuity {
                    expected_x: end.x,
                    expected_y: end.y,
                    found_x: start.x,
                    found_y: start.y,
                });
            }
        }
        self.segments.push(segment);
        Ok(())
    }

    /// Consume the path and return it closed.
    ///
    /// If the last endpoint differs from the first, a straight closing
    /// segment is appended first, so a closed path always ends at its start.
    pub fn close_path(mut self) -> Result<Self, GeometryError> {
        if self.closed {
            return Err(GeometryError::AlreadyClosed);
        }
        let (Some(start), Some(end)) = (self.start(), self.end()) else {
            return Err(GeometryError::EmptyPath);
        };
        if start != end {
            self.segments.push(Segment::line(end, start));
        }
        self.closed = true;
        Ok(self)
    }

    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn start(&self) -> Option<Point> {
        self.segments.first().map(Segment::from)
    }

    pub fn end(&self) -> Option<Point> {
        self.segments.last().map(Segment::to)
    }

    /// Bounds of every segment, or `None` for an empty path.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.segments
            .iter()
            .map(Segment::bounding_box)
            .reduce(|a, b| a.union(&b))
    }

    /// The path with every segment transformed. Shared endpoints stay
    /// bit-identical because the same input point always maps to the same
    /// output point.
    pub fn transformed(&self, transform: &Transform) -> Path {
        Path {
            segments: self.segments.iter().map(|s| s.transformed(transform)).collect(),
            closed: self.closed,
        }
    }
}

impl BoundingBox {
    /// The box spanned by two corner points (in any order).
    pub fn from_points(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Smallest box containing all `points`, or `None` if empty.
    pub fn around<I: IntoIterator<Item = Point>>(points: I) -> Option<Self> {
        points
            .into_iter()
            .map(|p| BoundingBox { min: p, max: p })
            .reduce(|a, b| a.union(&b))
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        self.min.lerp(self.max, 0.5)
    }

    pub fn diagonal(&self) -> f64 {
        self.min.distance(self.max)
    }

    /// Grow (or with a negative margin, shrink) on every side.
    pub fn expanded(&self, margin: f64) -> BoundingBox {
        BoundingBox {
            min: Point::new(self.min.x - margin, self.min.y - margin),
            max: Point::new(self.max.x + margin, self.max.y + margin),
        }
    }

    /// True if `other` lies inside `self`, allowing `eps` of slack.
    pub fn contains_box(&self, other: &BoundingBox, eps: f64) -> bool {
        other.min.x >= self.min.x - eps
            && other.min.y >= self.min.y - eps
            && other.max.x <= self.max.x + eps
            && other.max.y <= self.max.y + eps
    }
}

/// Round to three decimals for display, dropping trailing zeros.
pub(crate) fn short(v: f64) -> String {
    let s = format!("{:.3}", v);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

/// Serde mirror of [`Path`] used to validate deserialized input.
#[derive(Deserialize)]
struct RawPath {
    segments: Vec<Segment>,
    #[serde(default)]
    closed: bool,
}

impl TryFrom<RawPath> for Path {
    type Error = GeometryError;

    fn try_from(raw: RawPath) -> Result<Self, Self::Error> {
        if raw.closed && raw.segments.is_empty() {
            return Err(GeometryError::EmptyPath);
        }
        Path::from_segments(raw.segments, raw.closed)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn point_distance() {
        assert_eq!(p(0.0, 0.0).distance(p(3.0, 4.0)), 5.0);
    }

    #[test]
    fn line_sample_interpolates() {
        let s = Segment::line(p(0.0, 0.0), p(10.0, 20.0));
        assert_eq!(s.sample(0.5), p(5.0, 10.0));
        assert_eq!(s.sample(2.0), p(10.0, 20.0));
    }

    #[test]
    fn bezier_sample_endpoints_and_middle() {
        let q = Segment::quadratic(p(0.0, 0.0), p(10.0, 10.0), p(20.0, 0.0));
        assert_eq!(q.sample(0.0), p(0.0, 0.0));
        assert_eq!(q.sample(1.0), p(20.0, 0.0));
        assert_eq!(q.sample(0.5), p(10.0, 5.0));

        let c = Segment::cubic(p(0.0, 0.0), p(0.0, 10.0), p(10.0, 10.0), p(10.0, 0.0));
        assert_eq!(c.sample(0.5), p(5.0, 7.5));
    }

    #[test]
    fn append_requires_continuity() {
        let path = Path::new().append_segment(Segment::line(p(0.0, 0.0), p(1.0, 0.0))).unwrap();
        let err = path
            .clone()
            .append_segment(Segment::line(p(2.0, 0.0), p(3.0, 0.0)))
            .unwrap_err();
        assert!(matches!(err, GeometryError::Discontinuity { .. }));

        let path = path.append_segment(Segment::line(p(1.0, 0.0), p(1.0, 1.0))).unwrap();
        assert_eq!(path.len(), 2);
    }

    #[test]
    fn close_adds_closing_line() {
        let path = Path::from_segments(
            [Segment::line(p(0.0, 0.0), p(1.0, 0.0)), Segment::line(p(1.0, 0.0), p(1.0, 1.0))],
            true,
        )
        .unwrap();
        assert!(path.is_closed());
        assert_eq!(path.len(), 3);
        assert_eq!(path.end(), path.start());
    }

    #[test]
    fn close_errors() {
        assert_eq!(Path::new().close_path(), Err(GeometryError::EmptyPath));
        let closed = Path::from_segments([Segment::line(p(0.0, 0.0), p(1.0, 0.0))], true).unwrap();
        assert_eq!(closed.clone().close_path(), Err(GeometryError::AlreadyClosed));
        assert_eq!(
            closed.append_segment(Segment::line(p(0.0, 0.0), p(2.0, 2.0))),
            Err(GeometryError::AlreadyClosed)
        );
    }

    #[test]
    fn nan_is_rejected() {
        let err = Path::new().append_segment(Segment::line(p(f64::NAN, 0.0), p(1.0, 0.0)));
        assert_eq!(err, Err(GeometryError::NonFinite("segment")));
    }

    #[test]
    fn bounding_box_uses_curve_extent() {
        // Control point pulls far out, but the curve only reaches half way.
        let path = Path::from_segments([Segment::quadratic(p(0.0, 0.0), p(5.0, 10.0), p(10.0, 0.0))], false)
            .unwrap();
        let bbox = path.bounding_box().unwrap();
        assert!((bbox.max.y - 5.0).abs() < 1e-9, "got {:?}", bbox);
        assert_eq!(bbox.min, p(0.0, 0.0));
        assert_eq!(Path::new().bounding_box(), None);
    }

    #[test]
    fn reversed_segment_matches_geometry() {
        let c = Segment::cubic(p(0.0, 0.0), p(1.0, 3.0), p(4.0, 3.0), p(5.0, 0.0));
        let r = c.reversed();
        assert!(c.approx_eq(&r, 1e-12));
        let s = c.sample(0.25);
        let t = r.sample(0.75);
        assert!(s.distance(t) < 1e-12);
    }

    #[test]
    fn short_number_format() {
        assert_eq!(short(90.0), "90");
        assert_eq!(short(100.0), "100");
        assert_eq!(short(22.5), "22.5");
        assert_eq!(short(50.000000000001), "50");
        assert_eq!(short(-0.0001), "0");
    }

    #[test]
    fn deserialize_validates_continuity() {
        let bad = r#"{"segments":[
            {"kind":"line","from":{"x":0.0,"y":0.0},"to":{"x":1.0,"y":0.0}},
            {"kind":"line","from":{"x":5.0,"y":0.0},"to":{"x":6.0,"y":0.0}}
        ],"closed":false}"#;
        assert!(serde_json::from_str::<Path>(bad).is_err());

        let good = r#"{"segments":[
            {"kind":"line","from":{"x":0.0,"y":0.0},"to":{"x":1.0,"y":0.0}}
        ],"closed":false}"#;
        let path: Path = serde_json::from_str(good).unwrap();
        assert_eq!(path.len(), 1);
    }
}
