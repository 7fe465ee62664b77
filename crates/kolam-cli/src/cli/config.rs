//! YAML configuration.
//!
//! Every section is optional; missing values fall back to built-in
//! defaults, and command-line flags override whatever the file says.
//!
//! ```yaml
//! defaults:
//!   style: pulli
//!   rows: 5
//!   cols: 5
//! analysis:
//!   tolerance: 0.1
//! export:
//!   palette: neon-blue
//!   stroke_width: 3
//! ```

use std::fs;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::debug;

use kolam::{AnalysisConfig, ExportOptions, Style};

/// Whole configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub analysis: AnalysisConfig,
    pub export: ExportOptions,
    pub defaults: Defaults,
}

/// Generation parameters used when a flag is not given.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub style: Style,
    pub rows: usize,
    pub cols: usize,
    pub spacing: f64,
    pub iterations: u32,
    pub seed: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self { style: Style::Sikku, rows: 7, cols: 7, spacing: 20.0, iterations: 3, seed: 0 }
    }
}

impl Config {
    /// Load a config file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        config
            .analysis
            .validate()
            .with_context(|| format!("invalid analysis section in {}", path.display()))?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// The file's config if a path was given, built-in defaults otherwise.
    pub fn resolve(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kolam::Palette;

    #[test]
    fn empty_file_gives_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.defaults.style, Style::Sikku);
        assert_eq!(config.export.stroke_width, 2.0);
        assert_eq!(config.export.palette, Palette::NeonPurple);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let yaml = "defaults:\n  style: padi\n  rows: 9\nexport:\n  palette: neon-green\nanalysis:\n  tolerance: 0.2\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.defaults.style, Style::Padi);
        assert_eq!(config.defaults.rows, 9);
        assert_eq!(config.defaults.cols, 7);
        assert_eq!(config.export.palette, Palette::NeonGreen);
        assert_eq!(config.export.stroke_width, 2.0);
        assert_eq!(config.analysis.tolerance, 0.2);
        assert_eq!(config.analysis.samples_per_segment, 32);
    }

    #[test]
    fn unknown_section_is_rejected() {
        assert!(serde_yaml::from_str::<Config>("colours: {}\n").is_err());
    }
}
