//! filehist - find the files you recently worked on from your shell history
//!
//! filehist provides:
//! - Command parsing that extracts file operands from history lines
//! - Resolution of relative paths against recently visited directories
//! - A cancellable background search with dedup, regex filter and result cap
//! - A tracked-files history fed by a shell hook (track/clean)
//! - Unified output format (jsonl/json/md/raw/plain)

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

mod app;
mod cli;
mod command;
mod core;
mod search;

fn main() -> Result<()> {
    // Check for unsupported platforms
    #[cfg(windows)]
    {
        eprintln!("Error: Windows is not supported. Please use WSL (not guaranteed to work).");
        std::process::exit(1);
    }

    let cli = cli::Cli::parse();
    init_logging(&cli);
    cli::run(cli)
}

/// Log to stderr; RUST_LOG overrides the level picked by --verbose/--quiet
fn init_logging(cli: &cli::Cli) {
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(!cli.no_color)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(env_filter);

    let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
}
