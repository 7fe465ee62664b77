//! `kolam styles` and `kolam gallery` - catalogue listings.

use clap::Args;

use kolam::{Style, presets};

use super::common::{OutputFormat, to_json, write_output};
use super::generate::parse_style;

/// List every style with its UI metadata.
pub fn cmd_styles() {
    println!("Available styles:");
    for style in Style::all() {
        let meta = style.metadata();
        println!("  {:<7} {} - {}", style.name(), meta.title, meta.description);
        println!("          rule: {}", meta.rule);
    }
}

#[derive(Debug, Args)]
pub struct GalleryArgs {
    /// Only presets of this style
    #[arg(short, long, value_parser = parse_style)]
    pub style: Option<Style>,

    /// Only the featured presets
    #[arg(long)]
    pub featured: bool,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

pub fn cmd_gallery(args: &GalleryArgs) -> anyhow::Result<()> {
    let source = if args.featured { presets::featured() } else { presets::all() };
    let chosen: Vec<&presets::Preset> = source
        .iter()
        .filter(|p| args.style.is_none_or(|s| p.style == s))
        .collect();

    let content = match args.format {
        OutputFormat::Json => to_json(&chosen)?,
        OutputFormat::Text => chosen
            .iter()
            .map(|p| {
                format!(
                    "{:<14} {:<6} {}x{} i{}  {}\n",
                    p.name, p.style.name(), p.rows, p.cols, p.iterations, p.description
                )
            })
            .collect(),
    };
    write_output(None, &content)
}
