//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Tessera static site generator CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: tessera.toml)
    #[arg(short = 'C', long, global = true, default_value = "tessera.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Build the manifest and pre-render every route to static HTML
    #[command(visible_alias = "b")]
    Build {
        /// Clean output directory completely before building
        #[arg(short, long)]
        clean: bool,

        /// Output directory path (relative to project root)
        #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
        output: Option<PathBuf>,
    },

    /// Resolve the bundler metafile into an asset manifest
    #[command(visible_alias = "m")]
    Manifest {
        /// Metafile to read instead of `build.metafile`
        #[arg(long, value_hint = clap::ValueHint::FilePath)]
        metafile: Option<PathBuf>,

        /// Print the manifest instead of writing it
        #[arg(long)]
        stdout: bool,
    },

    /// Show which route a URL path resolves to
    Match {
        /// URL path to match (e.g. /blog/hello)
        path: String,
    },
}

impl Cli {
    pub const fn is_build(&self) -> bool {
        matches!(self.command, Commands::Build { .. })
    }
}
