//! lsdj-tools - manage LittleSoundDJ saves from the command line

use std::io;

use anyhow::Result;
use clap::{Parser, Subcommand};
use lsdj_tools::{
    collect, export, import, inspect, CollectArgs, ExportArgs, ImportArgs, InspectArgs,
};
use tracing_subscriber::EnvFilter;

/// Utilities for LittleSoundDJ .sav, .lsdsng and .kit files
#[derive(Parser)]
#[command(name = "lsdj-tools", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Inspect .sav, .lsdsng and .kit files, or entire folders of them
    Inspect(InspectArgs),

    /// Export .lsdsng's from a .sav file
    Export(ExportArgs),

    /// Import .lsdsng's (and the songs of other saves) into a new .sav file
    Import(ImportArgs),

    /// Collect all versions of a (set of) song and print them
    Collect(CollectArgs),
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("LSDJ_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let stdout = io::stdout();
    let out = stdout.lock();

    match Cli::parse().command {
        Command::Inspect(args) => inspect(&args, out),
        Command::Export(args) => export(&args, out),
        Command::Import(args) => import(&args, out),
        Command::Collect(args) => collect(&args, out),
    }
}
