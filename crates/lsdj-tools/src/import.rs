//! The `import` subcommand

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use lsdj::error::CompressBlockError;
use lsdj::fs::{File, Index};
use lsdj::lsdsng::LsdSng;
use lsdj::sram::SRam;

use crate::utils::{confirm_overwrite, has_extension, iter_files};

/// Arguments for the `import` subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct ImportArgs {
    /// Paths to the songs (or saves whose songs) should be imported
    pub song: Vec<PathBuf>,

    /// The output path
    #[arg(short, long)]
    pub output: PathBuf,

    /// Overwrite the output without asking
    #[arg(short, long)]
    pub yes: bool,
}

/// Import `.lsdsng`s, and the songs of other saves, into a new `.sav` file.
pub fn import<W>(args: &ImportArgs, mut out: W) -> Result<()>
where
    W: Write,
{
    let mut builder = Builder::default();

    for path in iter_files(&args.song, true, &["lsdsng", "sav"]) {
        if has_extension(&path, "lsdsng") {
            let lsdsng = LsdSng::from_path(&path)
                .with_context(|| format!("Could not read {}", path.display()))?;

            let index = builder.insert(&lsdsng, &path)?;
            writeln!(out, "{index:02} => {}", path.display())?;
        } else {
            let sav = SRam::from_path(&path)
                .with_context(|| format!("Could not read {}", path.display()))?;

            for file in sav.filesystem.files().flatten() {
                let index = builder.insert(&file, &path)?;
                let name = file.name().context("Invalid file name")?;
                writeln!(out, "{index:02} => {} - {}", path.display(), name)?;
            }
        }
    }

    if !confirm_overwrite(&args.output, args.yes)? {
        tracing::info!(path = %args.output.display(), "not overwriting");
        return Ok(());
    }

    builder
        .sram
        .to_path(&args.output)
        .with_context(|| format!("Could not write {}", args.output.display()))?;

    writeln!(out, "Wrote {}", args.output.display())?;

    Ok(())
}

/// Fills the slots of a fresh SRAM in order
#[derive(Default)]
struct Builder {
    sram: SRam,
    next: usize,
}

impl Builder {
    fn insert(&mut self, file: &impl File, source: &Path) -> Result<Index> {
        let Ok(index) = Index::try_from(self.next) else {
            bail!("Reached the maximum of 32 files, aborting import");
        };

        let name = file.name().context("Invalid file name")?;
        let song = file
            .decompress()
            .with_context(|| format!("Could not decompress {}", source.display()))?;

        match self
            .sram
            .filesystem
            .insert_file(index, &name, file.version(), &song)
        {
            Ok(_) => (),
            Err(CompressBlockError::NoBlockLeft) => {
                bail!("Ran out of space in the SRAM while importing {name}")
            }
            Err(error) => return Err(error).context("Could not insert song"),
        }

        self.next += 1;
        Ok(index)
    }
}
