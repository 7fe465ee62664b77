//! kolam - generate, analyze and export kolam patterns
//!
//! Usage:
//!   kolam generate [--style S] [--rows R] [--cols C] ...   Generate a pattern
//!   kolam analyze <pattern>                                Symmetry and decomposition
//!   kolam steps <pattern>                                  Construction steps
//!   kolam export <pattern> [--steps N]                     Re-export as SVG
//!   kolam styles                                           List styles
//!   kolam gallery                                          List featured presets
//!
//! Patterns are read from kolam SVG, plain SVG or JSON files (`-` for stdin).
//! Results go to stdout; logs go to stderr.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

mod cli;

use cli::{AnalyzeArgs, ExportArgs, GalleryArgs, GenerateArgs, StepsArgs};

#[derive(Parser)]
#[command(name = "kolam")]
#[command(author, version, about = "Generate, analyze and export kolam patterns")]
struct Cli {
    /// YAML file with `analysis`, `export` and `defaults` sections
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Raise log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a pattern from parameters or a gallery preset
    Generate(GenerateArgs),
    /// Report symmetry, transform decomposition and concepts
    Analyze(AnalyzeArgs),
    /// List the construction steps of a pattern
    Steps(StepsArgs),
    /// Write a pattern (or a prefix of its steps) as SVG
    Export(ExportArgs),
    /// List the available styles
    Styles,
    /// List the featured presets
    Gallery(GalleryArgs),
}

fn main() -> ExitCode {
    let args = Cli::parse();
    cli::init_logging(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Cli) -> anyhow::Result<()> {
    let config = cli::Config::resolve(args.config.as_deref())?;

    match args.command {
        Command::Generate(cmd) => cli::cmd_generate(&cmd, &config),
        Command::Analyze(cmd) => cli::cmd_analyze(&cmd, &config),
        Command::Steps(cmd) => cli::cmd_steps(&cmd),
        Command::Export(cmd) => cli::cmd_export(&cmd, &config),
        Command::Styles => {
            cli::cmd_styles();
            Ok(())
        }
        Command::Gallery(cmd) => cli::cmd_gallery(&cmd),
    }
}
