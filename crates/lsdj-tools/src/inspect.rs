//! The `inspect` subcommand

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use lsdj::fs::{File, Filesystem};
use lsdj::kit::Kit;
use lsdj::lsdsng::LsdSng;
use lsdj::sram::SRam;

use crate::utils::{has_extension, iter_files};

const BAR_LEN: usize = 24;

/// Arguments for the `inspect` subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct InspectArgs {
    /// The path(s) to inspect
    pub path: Vec<PathBuf>,

    /// Search folders recursively
    #[arg(short, long)]
    pub recursive: bool,
}

/// Print the contents of every save, song and kit found.
pub fn inspect<W>(args: &InspectArgs, mut out: W) -> Result<()>
where
    W: Write,
{
    let paths = iter_files(&args.path, args.recursive, &["sav", "lsdsng", "kit"]);
    tracing::debug!(count = paths.len(), "inspecting files");

    for (position, path) in paths.iter().enumerate() {
        if position > 0 {
            writeln!(out)?;
        }
        print(path, &mut out)?;
    }

    Ok(())
}

fn print<W>(path: &Path, mut out: W) -> Result<()>
where
    W: Write,
{
    writeln!(out, "{}", path.display())?;

    if has_extension(path, "sav") {
        let sram = SRam::from_path(path)
            .with_context(|| format!("Could not read the SRAM from {}", path.display()))?;

        writeln!(out, "{}", memory_bar(&sram.filesystem))?;
        for file in sram.filesystem.files().flatten() {
            print_file(usize::from(file.index()), &file, &mut out)?;
        }
    } else if has_extension(path, "lsdsng") {
        let lsdsng = LsdSng::from_path(path)
            .with_context(|| format!("Could not read the song from {}", path.display()))?;
        print_file(0, &lsdsng, &mut out)?;
    } else if has_extension(path, "kit") {
        let kit = Kit::from_path(path)
            .with_context(|| format!("Could not read the kit from {}", path.display()))?;
        write!(out, "{kit}")?;
    }

    Ok(())
}

/// A bar showing how many filesystem blocks are in use
pub fn memory_bar(filesystem: &Filesystem) -> String {
    let blocks = filesystem.blocks_used_count();
    let filled = blocks * BAR_LEN / Filesystem::BLOCKS_CAPACITY;

    format!(
        "Mem {:03}/{:03} [{}{}]",
        blocks,
        Filesystem::BLOCKS_CAPACITY,
        "=".repeat(filled),
        " ".repeat(BAR_LEN - filled)
    )
}

fn print_file<W>(index: usize, file: &impl File, mut out: W) -> Result<()>
where
    W: Write,
{
    let name = file.name().context("Could not parse the file name")?;
    let song = file.decompress().context("Could not decompress the file")?;

    writeln!(
        out,
        "{index:>3} | {:<8} | v{:03} | f{:03}",
        name.as_str(),
        file.version(),
        song.format_version()
    )?;

    Ok(())
}
