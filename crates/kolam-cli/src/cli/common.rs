//! Common utilities shared across CLI commands.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::Context;
use clap::ValueEnum;
use serde::Serialize;

use kolam::{Pattern, load_svg};

/// Output format for commands that can emit either text or JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Read a pattern from a file, or stdin when `path` is `-`.
///
/// JSON input is a serialized [`Pattern`]; anything else is treated as SVG
/// (kolam export or plain SVG).
pub fn read_pattern(path: &Path) -> anyhow::Result<Pattern> {
    let content = if path == Path::new("-") {
        let mut content = String::new();
        io::stdin().read_to_string(&mut content).context("failed to read stdin")?;
        content
    } else {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?
    };

    if content.trim_start().starts_with('{') {
        serde_json::from_str(&content).with_context(|| format!("invalid pattern JSON in {}", path.display()))
    } else {
        load_svg(&content).with_context(|| format!("invalid SVG in {}", path.display()))
    }
}

/// Write `content` to `output`, or stdout when none is given.
pub fn write_output(output: Option<&Path>, content: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(content.as_bytes()).context("failed to write stdout")?;
        }
    }
    Ok(())
}

/// Pretty JSON with a trailing newline.
pub fn to_json<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(value).context("failed to serialize JSON")?;
    json.push('\n');
    Ok(json)
}
