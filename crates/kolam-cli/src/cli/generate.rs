//! `kolam generate` - build a pattern and write it as SVG or JSON.

use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Args, ValueEnum};
use tracing::info;

use kolam::{GenerateParams, Style, export, generate, make_grid, presets};

use super::common::{to_json, write_output};
use super::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PatternFormat {
    Svg,
    Json,
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Start from a gallery preset (flags below override its values)
    #[arg(short, long)]
    pub preset: Option<String>,

    /// sikku, pulli, kambi or padi (aliases such as "dot-grid" accepted)
    #[arg(short, long, value_parser = parse_style)]
    pub style: Option<Style>,

    #[arg(short, long)]
    pub rows: Option<usize>,

    #[arg(short, long)]
    pub cols: Option<usize>,

    /// Distance between neighbouring dots
    #[arg(long)]
    pub spacing: Option<f64>,

    /// Visited dots (sikku), rings (pulli), leaves (kambi) or layers (padi)
    #[arg(short, long)]
    pub iterations: Option<u32>,

    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(short, long, value_enum, default_value_t = PatternFormat::Svg)]
    pub format: PatternFormat,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn parse_style(name: &str) -> Result<Style, String> {
    Style::from_name(name).ok_or_else(|| {
        let known: Vec<&str> = Style::all().iter().map(|s| s.name()).collect();
        format!("unknown style '{name}' (expected one of: {})", known.join(", "))
    })
}

impl GenerateArgs {
    /// Merge flags over the preset (if any) over the config defaults.
    pub fn params(&self, config: &Config) -> anyhow::Result<GenerateParams> {
        let d = config.defaults;
        let (mut style, mut rows, mut cols, mut spacing, mut iterations, mut seed) =
            (d.style, d.rows, d.cols, d.spacing, d.iterations, d.seed);

        if let Some(name) = &self.preset {
            let Some(preset) = presets::find(name) else {
                bail!("unknown preset '{name}' (see `kolam gallery`)");
            };
            style = preset.style;
            rows = preset.rows;
            cols = preset.cols;
            spacing = preset.spacing;
            iterations = preset.iterations;
            seed = preset.seed;
        }

        style = self.style.unwrap_or(style);
        rows = self.rows.unwrap_or(rows);
        cols = self.cols.unwrap_or(cols);
        spacing = self.spacing.unwrap_or(spacing);
        iterations = self.iterations.unwrap_or(iterations);
        seed = self.seed.unwrap_or(seed);

        let grid = make_grid(rows, cols, spacing).context("invalid grid")?;
        Ok(GenerateParams { style, grid, iterations, seed })
    }
}

pub fn cmd_generate(args: &GenerateArgs, config: &Config) -> anyhow::Result<()> {
    let params = args.params(config)?;
    let pattern = generate(&params).with_context(|| format!("failed to generate {}", params.pattern_id()))?;
    info!(id = pattern.id(), segments = pattern.segment_count(), "generated");

    let content = match args.format {
        PatternFormat::Svg => export(&pattern, None, &config.export),
        PatternFormat::Json => to_json(&pattern)?,
    };
    write_output(args.output.as_deref(), &content)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> GenerateArgs {
        GenerateArgs {
            preset: None,
            style: None,
            rows: None,
            cols: None,
            spacing: None,
            iterations: None,
            seed: None,
            format: PatternFormat::Svg,
            output: None,
        }
    }

    #[test]
    fn defaults_come_from_config() {
        let params = args().params(&Config::default()).unwrap();
        assert_eq!(params.pattern_id(), "sikku-7x7-20-i3-s0");
    }

    #[test]
    fn flags_override_preset() {
        let a = GenerateArgs { preset: Some("temple-steps".into()), seed: Some(9), ..args() };
        let params = a.params(&Config::default()).unwrap();
        assert_eq!(params.style, Style::Padi);
        assert_eq!(params.iterations, 5);
        assert_eq!(params.seed, 9);
    }

    #[test]
    fn unknown_preset_fails() {
        let a = GenerateArgs { preset: Some("nope".into()), ..args() };
        assert!(a.params(&Config::default()).is_err());
    }

    #[test]
    fn style_aliases_parse() {
        assert_eq!(parse_style("dot-grid"), Ok(Style::Pulli));
        assert!(parse_style("rangoli").unwrap_err().contains("sikku"));
    }
}
