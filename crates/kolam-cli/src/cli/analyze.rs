//! `kolam analyze` - symmetry report, transform decomposition and concepts.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use serde::Serialize;

use kolam::{Analysis, Pattern, analyze_with};

use super::common::{OutputFormat, read_pattern, to_json, write_output};
use super::config::Config;

#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Pattern file (kolam SVG, plain SVG or JSON); `-` reads stdin
    pub input: PathBuf,

    /// Coincidence tolerance in pattern units
    #[arg(short, long)]
    pub tolerance: Option<f64>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct AnalysisOutput<'a> {
    id: &'a str,
    style: kolam::Style,
    group: String,
    labels: Vec<String>,
    #[serde(flatten)]
    analysis: &'a Analysis,
}

pub fn cmd_analyze(args: &AnalyzeArgs, config: &Config) -> anyhow::Result<()> {
    let pattern = read_pattern(&args.input)?;

    let mut analysis_config = config.analysis;
    if let Some(tolerance) = args.tolerance {
        analysis_config.tolerance = tolerance;
    }
    let analysis = analyze_with(&pattern, &analysis_config)
        .with_context(|| format!("failed to analyze {}", pattern.id()))?;

    let content = match args.format {
        OutputFormat::Json => to_json(&AnalysisOutput {
            id: pattern.id(),
            style: pattern.style(),
            group: analysis.report.group_name(),
            labels: analysis.report.labels(),
            analysis: &analysis,
        })?,
        OutputFormat::Text => render_text(&pattern, &analysis),
    };
    write_output(None, &content)
}

fn render_text(pattern: &Pattern, analysis: &Analysis) -> String {
    let grid = pattern.grid();
    let mut out = String::new();
    out.push_str(&format!(
        "Pattern: {} ({}, {}x{} grid, spacing {})\n",
        pattern.id(),
        pattern.style(),
        grid.rows(),
        grid.cols(),
        grid.spacing()
    ));
    out.push_str(&format!("Segments: {}\n", pattern.segment_count()));
    out.push_str(&format!("Symmetry group: {}\n", analysis.report.group_name()));
    for label in analysis.report.labels() {
        out.push_str(&format!("  - {label}\n"));
    }
    out.push_str(&format!("Centroid: ({}, {})\n", analysis.centroid.x, analysis.centroid.y));

    let decomposition = &analysis.decomposition;
    out.push_str(&format!(
        "Motif: {} of {} segments\n",
        decomposition.motif.len(),
        pattern.segment_count()
    ));
    if decomposition.is_trivial() {
        out.push_str("  (no repeating transform)\n");
    }
    for op in &decomposition.operations {
        out.push_str(&format!("  - {}\n", op.describe()));
    }
    if !analysis.concepts().is_empty() {
        out.push_str(&format!("Concepts: {}\n", analysis.concepts().join(", ")));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use kolam::{GenerateParams, Style, analyze, generate, make_grid};

    #[test]
    fn text_report_lists_every_section() {
        let params = GenerateParams {
            style: Style::Pulli,
            grid: make_grid(3, 3, 20.0).unwrap(),
            iterations: 1,
            seed: 7,
        };
        let pattern = generate(&params).unwrap();
        let text = render_text(&pattern, &analyze(&pattern).unwrap());

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Pattern: pulli-3x3-20-i1-s7 (pulli, 3x3 grid, spacing 20)");
        assert!(lines.contains(&"Symmetry group: D4"));
        assert!(lines.contains(&"  - rotational order 4"));
        assert!(lines.iter().any(|l| l.starts_with("Motif: ")));
        assert!(lines.last().is_some_and(|l| l.starts_with("Concepts: ")));
        assert!(text.ends_with('\n'));
    }
}
