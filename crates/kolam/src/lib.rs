//! # kolam
//!
//! Kolam pattern generation and geometric analysis.
//!
//! The pipeline: build a [`GridSpec`], [`generate`] a [`Pattern`] in one of
//! four [`Style`]s, [`analyze`] its symmetry, [`sequence`] it into drawing
//! steps, and [`export`] it (or a prefix of the steps) as SVG.
//!
//! ```
//! use kolam::{GenerateParams, Style, analyze, generate, make_grid};
//!
//! let params = GenerateParams {
//!     style: Style::Pulli,
//!     grid: make_grid(3, 3, 20.0)?,
//!     iterations: 1,
//!     seed: 7,
//! };
//! let pattern = generate(&params)?;
//! let analysis = analyze(&pattern)?;
//! assert_eq!(analysis.report.rotational_order, 4);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Rust Lesson #7: Modules and Re-exports
//!
//! Each module below owns one stage of the pipeline. `pub use` lifts the
//! names callers need most to the crate root, so `kolam::generate` works
//! without spelling out `kolam::patterns::generate`. The long paths keep
//! working for everything that is not re-exported.

pub mod analysis;
pub mod error;
pub mod euler;
pub mod geometry;
pub mod grid;
pub mod patterns;
pub mod presets;
pub mod rng;
pub mod sequence;
pub mod svg;
pub mod transform;

// Re-export common types at crate root for convenience.
pub use analysis::{Analysis, AnalysisConfig, Decomposition, Operation, SymmetryReport, Translation, analyze, analyze_with};
pub use error::{AnalysisError, CoverageError, GenerationError, GeometryError, SvgError};
pub use geometry::{BoundingBox, Path, Point, Segment};
pub use grid::{GridSpec, make_grid};
pub use patterns::{GenerateParams, Pattern, SegmentRef, Style, StyleMetadata, generate};
pub use presets::Preset;
pub use sequence::{ConstructionStep, SequencePolicy, check_coverage, sequence, sequence_with};
pub use svg::{ExportOptions, Palette, export, import_svg, load_svg, parse_svg};
pub use transform::Transform;
