//! dpix - resolve image assets for high-density displays.

mod cli;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use dpix::{ResolverConfig, TerminalSink, debug, logger};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let cwd = std::env::current_dir().context("failed to read current directory")?;
    let config = ResolverConfig::discover(&cli.config, &cwd)
        .with_context(|| format!("failed to load `{}`", cli.config.display()))?;
    if config.config_path.as_os_str().is_empty() {
        debug!("config"; "no {} found, using defaults", cli.config.display());
    } else {
        debug!("config"; "loaded {}", config.config_path.display());
    }

    let resolver = config.build_resolver(Arc::new(TerminalSink));

    let result = match &cli.command {
        Commands::Resolve { args } => cli::resolve::run_resolve(args, resolver),
        Commands::Derive { reference, scale } => {
            cli::resolve::run_derive(reference, *scale, &resolver)
        }
    };

    if config.policy.trace {
        debug!("trace"; "total {}ms", dpix::resolve::trace::cumulative().as_millis());
    }
    result
}
