//! Pattern generators for the four kolam styles.
//!
//! Each style lives in its own file and turns `(grid, iterations, seed)`
//! into a list of paths. [`generate`] validates the parameters, dispatches
//! to the style, and wraps the result in an immutable [`Pattern`].

mod kambi;
mod padi;
mod pulli;
mod sikku;

pub use padi::LAYER_GROWTH;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GenerationError, GeometryError};
use crate::geometry::{BoundingBox, Path, Segment};
use crate::grid::GridSpec;

/// Metadata describing a style for UI display.
#[derive(Debug, Clone, Copy)]
pub struct StyleMetadata {
    /// Human-facing title
    pub title: &'static str,
    /// Brief description of the style
    pub description: &'static str,
    /// The construction rule the generator enforces
    pub rule: &'static str,
}

impl StyleMetadata {
    pub const fn new(title: &'static str, description: &'static str, rule: &'static str) -> Self {
        Self { title, description, rule }
    }
}

/// Available kolam styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    Sikku,
    Pulli,
    Kambi,
    Padi,
}

impl Style {
    /// Get all available styles.
    pub fn all() -> &'static [Style] {
        &[Style::Sikku, Style::Pulli, Style::Kambi, Style::Padi]
    }

    /// Get style name as string.
    pub fn name(&self) -> &'static str {
        match self {
            Style::Sikku => "sikku",
            Style::Pulli => "pulli",
            Style::Kambi => "kambi",
            Style::Padi => "padi",
        }
    }

    /// Get UI metadata for this style.
    pub fn metadata(&self) -> StyleMetadata {
        match self {
            Style::Sikku => StyleMetadata::new(
                "Sikku Kolam",
                "Continuous line weaving around the dots",
                "One closed stroke; no pen lifts",
            ),
            Style::Pulli => StyleMetadata::new(
                "Pulli Kolam",
                "Loops around dots linked cell by cell",
                "Closed rings per dot plus one diamond per cell",
            ),
            Style::Kambi => StyleMetadata::new(
                "Kambi Kolam",
                "Freehand leaf motifs scattered over the grid",
                "Fixed curve template at seeded dots and angles",
            ),
            Style::Padi => StyleMetadata::new(
                "Padi Kolam",
                "Concentric layers around a shared centre",
                "Each layer 1.3x the previous, inside the grid",
            ),
        }
    }

    /// Parse a style from its name or a common alias.
    pub fn from_name(name: &str) -> Option<Style> {
        match name.to_lowercase().as_str() {
            "sikku" | "continuous" | "continuous-line" | "chikku" => Some(Style::Sikku),
            "pulli" | "dot-grid" | "dots" | "dot" => Some(Style::Pulli),
            "kambi" | "freehand" | "free" => Some(Style::Kambi),
            "padi" | "concentric" | "layers" => Some(Style::Padi),
            _ => None,
        }
    }
}

impl std::fmt::Display for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything a generator needs. Identical params give identical patterns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerateParams {
    pub style: Style,
    pub grid: GridSpec,
    pub iterations: u32,
    pub seed: u64,
}

impl GenerateParams {
    /// Stable identifier derived from the parameters.
    pub fn pattern_id(&self) -> String {
        format!(
            "{}-{}x{}-{}-i{}-s{}",
            self.style,
            self.grid.rows(),
            self.grid.cols(),
            self.grid.spacing(),
            self.iterations,
            self.seed
        )
    }
}

/// Address of one segment inside a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SegmentRef {
    pub path: usize,
    pub segment: usize,
}

impl std::fmt::Display for SegmentRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "path {} segment {}", self.path, self.segment)
    }
}

/// A finished pattern. Read-only once built; regenerate to change it.
///
/// Every path holds at least one segment, so a [`SegmentRef`] stays valid
/// across export and re-import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPattern")]
pub struct Pattern {
    id: String,
    grid: GridSpec,
    paths: Vec<Path>,
    style: Style,
}

impl Pattern {
    /// Wrap externally supplied geometry (e.g. for analysis).
    ///
    /// # Errors
    /// [`GeometryError::EmptyPath`] if any path has no segments.
    pub fn new(
        id: impl Into<String>,
        grid: GridSpec,
        paths: Vec<Path>,
        style: Style,
    ) -> Result<Self, GeometryError> {
        if paths.iter().any(Path::is_empty) {
            return Err(GeometryError::EmptyPath);
        }
        Ok(Self { id: id.into(), grid, paths, style })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    pub fn style(&self) -> Style {
        self.style
    }

    /// Total segment count across all paths.
    pub fn segment_count(&self) -> usize {
        self.paths.iter().map(Path::len).sum()
    }

    /// Every segment with its address, paths in order.
    pub fn segments(&self) -> impl Iterator<Item = (SegmentRef, &Segment)> + '_ {
        self.paths.iter().enumerate().flat_map(|(p, path)| {
            path.segments()
                .iter()
                .enumerate()
                .map(move |(s, seg)| (SegmentRef { path: p, segment: s }, seg))
        })
    }

    /// Look up one segment.
    pub fn segment(&self, at: SegmentRef) -> Option<&Segment> {
        self.paths.get(at.path)?.segments().get(at.segment)
    }

    /// Bounds of all paths, or `None` if the pattern has no segments.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.paths
            .iter()
            .filter_map(Path::bounding_box)
            .reduce(|a, b| a.union(&b))
    }
}

/// Build a pattern from parameters.
///
/// # Errors
/// - [`GenerationError::InvalidIterations`] if `iterations < 1`
/// - [`GenerationError::NonEulerianConstruction`] (Sikku) if the walk
///   cannot reach `iterations` dots in one stroke
/// - [`GenerationError::LayerOverflow`] (Padi) if a layer leaves the grid
pub fn generate(params: &GenerateParams) -> Result<Pattern, GenerationError> {
    if params.iterations < 1 {
        return Err(GenerationError::InvalidIterations(params.iterations));
    }
    let grid = &params.grid;
    let iterations = params.iterations as usize;

    debug!(
        style = %params.style,
        rows = grid.rows(),
        cols = grid.cols(),
        spacing = grid.spacing(),
        iterations,
        seed = params.seed,
        "generating pattern"
    );

    let paths = match params.style {
        Style::Sikku => sikku::generate(grid, iterations, params.seed)?,
        Style::Pulli => pulli::generate(grid, iterations, params.seed)?,
        Style::Kambi => kambi::generate(grid, iterations, params.seed)?,
        Style::Padi => padi::generate(grid, iterations, params.seed)?,
    };

    let pattern = Pattern::new(params.pattern_id(), *grid, paths, params.style)?;
    debug!(
        id = pattern.id(),
        paths = pattern.paths().len(),
        segments = pattern.segment_count(),
        "pattern generated"
    );
    Ok(pattern)
}

#[derive(Deserialize)]
struct RawPattern {
    id: String,
    grid: GridSpec,
    paths: Vec<Path>,
    style: Style,
}

impl TryFrom<RawPattern> for Pattern {
    type Error = GeometryError;

    fn try_from(raw: RawPattern) -> Result<Self, Self::Error> {
        Pattern::new(raw.id, raw.grid, raw.paths, raw.style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::make_grid;

    fn params(style: Style, rows: usize, cols: usize, iterations: u32, seed: u64) -> GenerateParams {
        GenerateParams { style, grid: make_grid(rows, cols, 20.0).unwrap(), iterations, seed }
    }

    #[test]
    fn style_names_round_trip() {
        for style in Style::all() {
            assert_eq!(Style::from_name(style.name()), Some(*style));
        }
        assert_eq!(Style::from_name("Continuous"), Some(Style::Sikku));
        assert_eq!(Style::from_name("dot-grid"), Some(Style::Pulli));
        assert_eq!(Style::from_name("freehand"), Some(Style::Kambi));
        assert_eq!(Style::from_name("concentric"), Some(Style::Padi));
        assert_eq!(Style::from_name("rangoli"), None);
    }

    #[test]
    fn zero_iterations_rejected() {
        let err = generate(&params(Style::Pulli, 3, 3, 0, 1)).unwrap_err();
        assert_eq!(err, GenerationError::InvalidIterations(0));
    }

    #[test]
    fn id_comes_from_params() {
        let p = params(Style::Sikku, 7, 7, 3, 42);
        assert_eq!(p.pattern_id(), "sikku-7x7-20-i3-s42");
        assert_eq!(generate(&p).unwrap().id(), "sikku-7x7-20-i3-s42");
    }

    #[test]
    fn every_style_generates() {
        for style in Style::all() {
            let pattern = generate(&params(*style, 5, 5, 2, 7)).unwrap();
            assert!(pattern.segment_count() > 0, "{style} produced nothing");
            assert_eq!(pattern.style(), *style);
        }
    }

    #[test]
    fn segment_lookup_matches_iteration() {
        let pattern = generate(&params(Style::Pulli, 2, 2, 1, 0)).unwrap();
        for (at, seg) in pattern.segments() {
            assert_eq!(pattern.segment(at), Some(seg));
        }
        assert_eq!(pattern.segment(SegmentRef { path: 999, segment: 0 }), None);
    }

    #[test]
    fn pattern_serde_round_trip() {
        let pattern = generate(&params(Style::Kambi, 3, 3, 2, 5)).unwrap();
        let json = serde_json::to_string(&pattern).unwrap();
        let back: Pattern = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pattern);
    }

    #[test]
    fn huge_padi_count_overflows_instead_of_aborting() {
        let err = generate(&params(Style::Padi, 7, 7, u32::MAX, 0)).unwrap_err();
        assert!(matches!(err, GenerationError::LayerOverflow { .. }), "{err:?}");
    }

    #[test]
    fn huge_sikku_count_is_unreachable() {
        let err = generate(&params(Style::Sikku, 3, 3, u32::MAX, 0)).unwrap_err();
        assert!(matches!(err, GenerationError::NonEulerianConstruction { reachable: 9, .. }), "{err:?}");
    }

    #[test]
    fn empty_paths_are_rejected() {
        let line = Path::from_segments(
            [Segment::line(crate::geometry::Point::new(0.0, 0.0), crate::geometry::Point::new(1.0, 0.0))],
            false,
        )
        .unwrap();
        let grid = make_grid(1, 1, 10.0).unwrap();
        let err = Pattern::new("gap", grid, vec![Path::new(), line.clone()], Style::Kambi).unwrap_err();
        assert_eq!(err, GeometryError::EmptyPath);
        assert!(Pattern::new("ok", grid, vec![line], Style::Kambi).is_ok());

        let json = r#"{"id":"gap","grid":{"rows":1,"cols":1,"spacing":10.0},
            "paths":[{"segments":[],"closed":false}],"style":"kambi"}"#;
        assert!(serde_json::from_str::<Pattern>(json).is_err());
    }
}
