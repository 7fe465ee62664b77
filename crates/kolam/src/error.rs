//! Error types for every layer of the engine.
//!
//! ## Rust Lesson #20: Error Handling (revisited)
//!
//! Each layer gets its own enum so a caller can match on exactly the
//! failures that layer can produce. `thiserror` writes the `Display` and
//! `std::error::Error` impls for us, and `#[from]` lets `?` convert a
//! lower-layer error into a higher-layer one automatically.

use thiserror::Error;

use crate::patterns::SegmentRef;

/// Errors from the grid and path/curve layers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Grid dimensions are unusable (rows or cols < 1, spacing <= 0).
    #[error("invalid grid dimensions: {rows} rows x {cols} cols, spacing {spacing}")]
    InvalidDimension { rows: usize, cols: usize, spacing: f64 },

    /// A dot index outside the grid.
    #[error("dot ({row}, {col}) is outside a {rows}x{cols} grid")]
    OutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// A segment does not start where the path currently ends.
    #[error("segment starts at ({found_x}, {found_y}) but the path ends at ({expected_x}, {expected_y})")]
    Discontinuity {
        expected_x: f64,
        expected_y: f64,
        found_x: f64,
        found_y: f64,
    },

    /// The path has already been closed.
    #[error("path is already closed")]
    AlreadyClosed,

    /// Closing (or otherwise finishing) a path with no segments.
    #[error("path has no segments")]
    EmptyPath,

    /// NaN or infinite coordinate.
    #[error("non-finite coordinate in {0}")]
    NonFinite(&'static str),
}

/// Errors from pattern generation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Iteration counts start at 1.
    #[error("iterations must be at least 1, got {0}")]
    InvalidIterations(u32),

    /// The continuous-line style cannot reach the requested size in one stroke.
    #[error("cannot thread {requested} dots in one stroke: only {reachable} reachable without lifting")]
    NonEulerianConstruction { requested: usize, reachable: usize },

    /// A concentric layer leaves the grid's extent.
    #[error("layer {layer} (scale {scale:.3}) overflows the grid extent")]
    LayerOverflow { layer: usize, scale: f64 },
}

/// Errors from symmetry analysis.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// No consistent report could be produced. Distinct from "order 1".
    #[error("analysis inconclusive: {reason}")]
    Inconclusive { reason: String },

    /// Tolerance or sampling resolution outside the usable range.
    #[error("invalid analysis configuration: {0}")]
    InvalidConfig(String),
}

impl AnalysisError {
    pub(crate) fn inconclusive(reason: impl Into<String>) -> Self {
        AnalysisError::Inconclusive { reason: reason.into() }
    }
}

/// A step sequence that does not cover a pattern exactly once.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoverageError {
    #[error("{0} is not covered by any step")]
    Missing(SegmentRef),

    #[error("{0} appears in more than one step")]
    Duplicate(SegmentRef),

    #[error("{0} does not exist in the pattern")]
    Unknown(SegmentRef),

    #[error("step at position {position} is numbered {found}")]
    Misnumbered { position: usize, found: usize },
}

/// Errors from reading SVG documents.
#[derive(Error, Debug)]
pub enum SvgError {
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("path data error: {0}")]
    PathData(#[from] svgtypes::Error),

    #[error("SVG parse error: {0}")]
    Usvg(#[from] usvg::Error),

    #[error("no paths found in SVG")]
    NoPaths,

    #[error("invalid value {value:?} for attribute {name}")]
    BadAttribute { name: &'static str, value: String },

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}
