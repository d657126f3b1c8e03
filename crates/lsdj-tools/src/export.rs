//! The `export` subcommand

use std::collections::BTreeSet;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use lsdj::fs::{File, Index};
use lsdj::sram::SRam;

use crate::utils::confirm_overwrite;

/// Arguments for the `export` subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct ExportArgs {
    /// The path to the save file to export from
    pub path: PathBuf,

    /// Indices of the songs that should be exported. No indices means all songs.
    pub index: Vec<usize>,

    /// The destination folder to place the songs
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Prepend the song position to the start of the filename
    #[arg(short = 'p', long)]
    pub output_pos: bool,

    /// Append the song version to the end of the filename
    #[arg(short = 'v', long)]
    pub output_version: bool,

    /// Use decimal version numbers, instead of hexadecimal
    #[arg(short, long)]
    pub decimal: bool,

    /// Overwrite existing files without asking
    #[arg(short, long)]
    pub yes: bool,
}

impl ExportArgs {
    /// The naming options selected on the command line
    pub fn filename_options(&self) -> FilenameOptions {
        FilenameOptions {
            position: self.output_pos,
            version: self.output_version,
            decimal: self.decimal,
        }
    }
}

/// How exported `.lsdsng` files are named
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilenameOptions {
    /// Prefix the file slot, as in `03_NAME`
    pub position: bool,

    /// Suffix the song version, as in `NAME_v1B`
    pub version: bool,

    /// Write the version in decimal (`_v027`) instead of hexadecimal
    pub decimal: bool,
}

impl FilenameOptions {
    /// The file name, including extension, for a song
    pub fn filename(&self, index: Index, name: &str, version: u8) -> String {
        let mut filename = String::new();

        if self.position {
            filename.push_str(&format!("{:02}_", index.value()));
        }

        filename.push_str(name);

        if self.version {
            if self.decimal {
                filename.push_str(&format!("_v{version:03}"));
            } else {
                filename.push_str(&format!("_v{version:02X}"));
            }
        }

        filename.push_str(".lsdsng");
        filename
    }
}

/// Export `.lsdsng`s from a `.sav` file.
pub fn export<W>(args: &ExportArgs, mut out: W) -> Result<()>
where
    W: Write,
{
    let sram = SRam::from_path(&args.path)
        .with_context(|| format!("Could not read the SRAM from {}", args.path.display()))?;

    // Slot order, each slot once
    let indices: BTreeSet<Index> = if args.index.is_empty() {
        Index::all().collect()
    } else {
        args.index
            .iter()
            .map(|&index| Index::try_from(index))
            .collect::<Result<_, _>>()
            .context("Invalid song index")?
    };

    let folder = match &args.output {
        Some(folder) => folder.clone(),
        None => std::env::current_dir().context("No working directory")?,
    };
    std::fs::create_dir_all(&folder)
        .with_context(|| format!("Could not create {}", folder.display()))?;

    let options = args.filename_options();

    for index in indices {
        let Some(file) = sram.filesystem.file(index) else {
            tracing::debug!(%index, "skipping empty slot");
            continue;
        };

        let lsdsng = file
            .lsdsng()
            .with_context(|| format!("Could not export song {index}"))?;

        let filename = options.filename(index, lsdsng.name.as_str(), lsdsng.version);
        let path = folder.join(&filename);

        if !confirm_overwrite(&path, args.yes)? {
            tracing::info!(path = %path.display(), "not overwriting");
            continue;
        }

        lsdsng
            .to_path(&path)
            .with_context(|| format!("Could not write {}", path.display()))?;

        writeln!(
            out,
            "{:02}. {:8} => {}",
            index.value(),
            lsdsng.name.as_str(),
            filename
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn index(value: u8) -> Index {
        Index::new(value).unwrap()
    }

    #[test]
    fn test_plain_filename() {
        let options = FilenameOptions::default();
        assert_eq!(options.filename(index(3), "YOKAI", 0x1B), "YOKAI.lsdsng");
    }

    #[test]
    fn test_full_filename() {
        let options = FilenameOptions {
            position: true,
            version: true,
            decimal: false,
        };
        assert_eq!(
            options.filename(index(3), "YOKAI", 0x1B),
            "03_YOKAI_v1B.lsdsng"
        );
    }

    #[test]
    fn test_decimal_version() {
        let options = FilenameOptions {
            version: true,
            decimal: true,
            ..FilenameOptions::default()
        };
        assert_eq!(
            options.filename(index(0), "YOKAI", 0x1B),
            "YOKAI_v027.lsdsng"
        );
    }

    #[test]
    fn test_decimal_without_version_is_ignored() {
        let options = FilenameOptions {
            decimal: true,
            ..FilenameOptions::default()
        };
        assert_eq!(options.filename(index(0), "A", 1), "A.lsdsng");
    }
}
