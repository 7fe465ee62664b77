//! `kolam export` - write a pattern as SVG with presentation options.
//!
//! `--steps N` writes the drawing as it stands after N construction steps;
//! `--frames DIR` writes one such file per step, for progressive reveal.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use kolam::{ExportOptions, Palette, export, sequence};

use super::common::{read_pattern, write_output};
use super::config::Config;

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// Pattern file (kolam SVG, plain SVG or JSON); `-` reads stdin
    pub input: PathBuf,

    /// Only draw the first N construction steps
    #[arg(long, conflicts_with = "frames")]
    pub steps: Option<usize>,

    /// Write frame-NNN.svg for every step prefix into this directory
    #[arg(long, value_name = "DIR")]
    pub frames: Option<PathBuf>,

    /// neon-purple, neon-blue, neon-orange or neon-green
    #[arg(long, value_parser = parse_palette)]
    pub palette: Option<Palette>,

    #[arg(long)]
    pub stroke_width: Option<f64>,

    #[arg(long)]
    pub padding: Option<f64>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

fn parse_palette(name: &str) -> Result<Palette, String> {
    Palette::from_name(name).ok_or_else(|| {
        let known: Vec<&str> = Palette::all().iter().map(|p| p.name()).collect();
        format!("unknown palette '{name}' (expected one of: {})", known.join(", "))
    })
}

impl ExportArgs {
    fn options(&self, config: &Config) -> ExportOptions {
        let base = config.export;
        ExportOptions {
            palette: self.palette.unwrap_or(base.palette),
            stroke_width: self.stroke_width.unwrap_or(base.stroke_width),
            padding: self.padding.unwrap_or(base.padding),
        }
    }
}

pub fn cmd_export(args: &ExportArgs, config: &Config) -> anyhow::Result<()> {
    let pattern = read_pattern(&args.input)?;
    let options = args.options(config);

    let Some(dir) = &args.frames else {
        return write_output(args.output.as_deref(), &export(&pattern, args.steps, &options));
    };

    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    let total = sequence(&pattern).len();
    for n in 1..=total {
        let path = dir.join(format!("frame-{n:03}.svg"));
        fs::write(&path, export(&pattern, Some(n), &options))
            .with_context(|| format!("failed to write {}", path.display()))?;
    }
    info!(frames = total, dir = %dir.display(), "wrote frames");
    eprintln!("Wrote {total} frames to {}", dir.display());
    Ok(())
}
