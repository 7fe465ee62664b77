//! Symmetry and transform analysis.
//!
//! ## Pipeline
//!
//! 1. Sample every segment at a fixed resolution; the mean of the samples
//!    is the centroid.
//! 2. Rotation: try orders 2, 3, 4, 6, 8 about the centroid; report the
//!    largest that maps the samples onto themselves.
//! 3. Reflection: try 0, 45, 90, 135 degrees plus the axes implied by each
//!    passing rotation; report every axis that passes.
//! 4. Translation (multi-cell grids only): smallest horizontal and vertical
//!    repeat in multiples of the grid spacing.
//! 5. Decompose the segments into a motif plus the operations above.
//!
//! Degenerate input is an error, never a report of "order 1".

mod decompose;
mod sampling;
mod symmetry;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use decompose::{Decomposition, Operation};
pub use symmetry::{ROTATION_ORDERS, SymmetryReport, Translation};

use crate::error::AnalysisError;
use crate::euler;
use crate::geometry::{Point, Segment};
use crate::patterns::Pattern;
use sampling::Samples;

/// Tolerance and sampling resolution for coincidence tests.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Largest distance (pattern units) at which two curves count as the same.
    pub tolerance: f64,
    /// Samples taken along each segment, not counting `t = 0`.
    pub samples_per_segment: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self { tolerance: 0.05, samples_per_segment: 32 }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !(self.tolerance > 0.0) || !self.tolerance.is_finite() {
            return Err(AnalysisError::InvalidConfig(format!(
                "tolerance must be a positive finite number, got {}",
                self.tolerance
            )));
        }
        if self.samples_per_segment < 2 {
            return Err(AnalysisError::InvalidConfig(format!(
                "need at least 2 samples per segment, got {}",
                self.samples_per_segment
            )));
        }
        Ok(())
    }
}

/// Everything the analyzer derives from one pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub report: SymmetryReport,
    pub decomposition: Decomposition,
    pub centroid: Point,
    concepts: Vec<String>,
}

impl Analysis {
    /// Mathematical ideas the pattern illustrates, for display next to it.
    pub fn concepts(&self) -> &[String] {
        &self.concepts
    }
}

/// Analyze with the default tolerance and resolution.
pub fn analyze(pattern: &Pattern) -> Result<Analysis, AnalysisError> {
    analyze_with(pattern, &AnalysisConfig::default())
}

/// Analyze a pattern.
///
/// # Errors
/// - [`AnalysisError::InvalidConfig`] for an unusable `config`
/// - [`AnalysisError::Inconclusive`] for an empty pattern, non-finite
///   coordinates, geometry smaller than the tolerance, or when no motif and
///   operations rebuild the pattern
pub fn analyze_with(pattern: &Pattern, config: &AnalysisConfig) -> Result<Analysis, AnalysisError> {
    config.validate()?;
    let eps = config.tolerance;

    if pattern.segment_count() == 0 {
        return Err(AnalysisError::inconclusive("pattern has no segments"));
    }
    if !pattern.segments().all(|(_, s)| s.is_finite()) {
        return Err(AnalysisError::inconclusive("pattern has non-finite coordinates"));
    }

    let samples = Samples::from_pattern(pattern, config.samples_per_segment);
    let (Some(bounds), Some(centroid)) = (samples.bounding_box(), samples.centroid()) else {
        return Err(AnalysisError::inconclusive("nothing to sample"));
    };
    if bounds.width().max(bounds.height()) < eps {
        return Err(AnalysisError::inconclusive("pattern is smaller than the tolerance"));
    }
    let index = samples.index(eps);

    let orders = symmetry::rotation_orders(&samples, &index, centroid, eps);
    let rotational_order = orders.last().copied().unwrap_or(1);
    let reflection_axes = symmetry::reflection_axes(&samples, &index, centroid, &orders, eps);

    let grid = pattern.grid();
    let translational = if grid.is_multi_cell() {
        symmetry::translational_repeat(&samples, &index, grid.spacing(), (grid.cols(), grid.rows()), eps)
    } else {
        None
    };

    let report = SymmetryReport { rotational_order, reflection_axes, translational };
    debug!(
        id = pattern.id(),
        group = %report.group_name(),
        axes = report.reflection_axes.len(),
        translational = report.translational.is_some(),
        "symmetry detected"
    );

    let decomposition = decompose::decompose(pattern, &report, &orders, centroid, eps)?;
    let concepts = concepts_for(pattern, &report, &decomposition);

    Ok(Analysis { report, decomposition, centroid, concepts })
}

fn concepts_for(pattern: &Pattern, report: &SymmetryReport, decomposition: &Decomposition) -> Vec<String> {
    let has = |kind: fn(&Segment) -> bool| pattern.segments().any(|(_, s)| kind(s));
    let mut concepts: Vec<&str> = Vec::new();

    if has(|s| matches!(s, Segment::Line { .. })) {
        concepts.push("line segments");
    }
    if has(|s| matches!(s, Segment::QuadraticBezier { .. })) {
        concepts.push("quadratic Bezier curves");
    }
    if has(|s| matches!(s, Segment::CubicBezier { .. })) {
        concepts.push("cubic Bezier curves");
    }
    if report.rotational_order > 1 {
        concepts.push("rotational symmetry");
        concepts.push("polar coordinates");
    }
    if !report.reflection_axes.is_empty() {
        concepts.push("reflection symmetry");
    }
    if report.rotational_order > 1 || !report.reflection_axes.is_empty() {
        concepts.push("group theory");
    }
    if report.translational.is_some() {
        concepts.push("tessellation");
    }
    if decomposition
        .operations
        .iter()
        .any(|op| matches!(op, Operation::Scale { .. }))
    {
        concepts.push("geometric progression");
    }
    if pattern.paths().len() == 1 && euler::is_single_stroke(pattern.paths()) {
        concepts.push("Eulerian paths");
    }
    concepts.into_iter().map(String::from).collect()
}
