//! CLI command implementations.
//!
//! This module contains the implementations for the various CLI subcommands:
//! - `generate` - Build a pattern from parameters or a preset
//! - `analyze` - Symmetry report, decomposition and concepts
//! - `steps` - Construction step listing
//! - `export` - SVG export, optionally a step prefix or one frame per step
//! - `styles` / `gallery` - Catalogue listings

pub mod analyze;
pub mod catalog;
pub mod common;
pub mod config;
pub mod export;
pub mod generate;
pub mod steps;

pub use analyze::{AnalyzeArgs, cmd_analyze};
pub use catalog::{GalleryArgs, cmd_gallery, cmd_styles};
pub use config::Config;
pub use export::{ExportArgs, cmd_export};
pub use generate::{GenerateArgs, cmd_generate};
pub use steps::{StepsArgs, cmd_steps};

use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise `-v` picks the level.
pub fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
