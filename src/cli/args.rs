//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use dpix::ScaleFactor;
use std::path::PathBuf;

/// Scale-aware image asset resolver
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path, searched upward from the current directory
    #[arg(short = 'C', long, global = true, default_value = dpix::config::CONFIG_FILE, value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Resolve references to the asset used at a display scale
    #[command(visible_alias = "r")]
    Resolve {
        #[command(flatten)]
        args: ResolveArgs,
    },

    /// Print the density-variant candidate derived for a reference
    #[command(visible_alias = "d")]
    Derive {
        /// Asset URL or filesystem path
        #[arg(value_name = "REF")]
        reference: String,

        /// Display scale: 100, 150 or 200 (also `150%`, `1.5x`)
        #[arg(short, long, default_value = "200")]
        scale: ScaleFactor,
    },
}

/// Resolve command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ResolveArgs {
    /// Asset URLs or filesystem paths
    #[arg(value_name = "REF", required = true, value_hint = clap::ValueHint::AnyPath)]
    pub refs: Vec<String>,

    /// Display scale: 100, 150 or 200 (also `150%`, `1.5x`)
    #[arg(short, long, default_value = "100")]
    pub scale: ScaleFactor,

    /// Open a byte stream instead of returning a path
    #[arg(long)]
    pub stream: bool,

    /// Serve the built-in placeholder when nothing is found
    #[arg(short, long)]
    pub placeholder: bool,

    /// Memoize lookups across the references of this run
    #[arg(long)]
    pub cache: bool,

    /// Print results as JSON
    #[arg(short, long)]
    pub json: bool,

    /// Pretty-print JSON output
    #[arg(long, requires = "json")]
    pub pretty: bool,
}
