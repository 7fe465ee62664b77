//! `kolam steps` - list a pattern's construction steps.

use std::path::PathBuf;

use anyhow::bail;
use clap::Args;

use kolam::{SequencePolicy, sequence, sequence_with};

use super::common::{OutputFormat, read_pattern, to_json, write_output};

#[derive(Debug, Args)]
pub struct StepsArgs {
    /// Pattern file (kolam SVG, plain SVG or JSON); `-` reads stdin
    pub input: PathBuf,

    /// per-path, per-segment or chunked:N (default depends on the style)
    #[arg(short, long, value_parser = parse_policy)]
    pub policy: Option<SequencePolicy>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

pub(crate) fn parse_policy(value: &str) -> Result<SequencePolicy, String> {
    match value {
        "per-path" => Ok(SequencePolicy::PerPath),
        "per-segment" => Ok(SequencePolicy::PerSegment),
        other => other
            .strip_prefix("chunked:")
            .and_then(|n| n.parse().ok())
            .filter(|&n: &usize| n > 0)
            .map(SequencePolicy::Chunked)
            .ok_or_else(|| format!("unknown policy '{other}' (expected per-path, per-segment or chunked:N)")),
    }
}

pub fn cmd_steps(args: &StepsArgs) -> anyhow::Result<()> {
    let pattern = read_pattern(&args.input)?;
    let steps = match args.policy {
        Some(policy) => sequence_with(&pattern, policy),
        None => sequence(&pattern),
    };
    if steps.is_empty() {
        bail!("pattern {} has nothing to draw", pattern.id());
    }

    let content = match args.format {
        OutputFormat::Json => to_json(&steps)?,
        OutputFormat::Text => {
            let width = steps.len().to_string().len();
            steps
                .iter()
                .map(|step| format!("{:>width$}. {}\n", step.index + 1, step.description))
                .collect()
        }
    };
    write_output(None, &content)
}
