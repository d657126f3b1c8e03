//! The `collect` subcommand

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use lsdj::fs::File;
use lsdj::lsdsng::LsdSng;
use lsdj::sram::SRam;
use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::utils::{has_extension, iter_files};

/// Arguments for the `collect` subcommand
#[derive(Args, Debug, Clone, Default)]
pub struct CollectArgs {
    /// The paths to walk and check for songs
    pub paths: Vec<PathBuf>,

    /// Walk folders recursively
    #[arg(short, long)]
    pub recursive: bool,

    /// A JSON file the outcome should be written to
    #[arg(long)]
    pub json: Option<PathBuf>,
}

/// Every song found, grouped by name
#[derive(Debug, Default, Serialize)]
pub struct Outcome {
    /// All versions found per song name
    pub songs: BTreeMap<String, Vec<Instance>>,

    /// Songs that could not be read
    pub errors: Vec<Source>,
}

/// A single version of a song
#[derive(Debug, Clone, Serialize)]
pub struct Instance {
    /// The song version
    pub version: u8,

    /// Hash of the decompressed song
    #[serde(serialize_with = "serialize_hex")]
    pub sha256: [u8; 32],

    /// Where the song was found
    pub source: Source,
}

/// Where a song was found
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// An exported song
    LsdSng {
        /// Path to the song
        path: PathBuf,
    },

    /// A slot in a save file
    Sav {
        /// Path to the save
        path: PathBuf,
        /// The file slot
        index: usize,
    },
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LsdSng { path } => write!(f, "{}", path.display()),
            Self::Sav { path, index } => write!(f, "{}[{index}]", path.display()),
        }
    }
}

/// Collect all versions of a (set of) song and print them.
pub fn collect<W>(args: &CollectArgs, mut out: W) -> Result<()>
where
    W: Write,
{
    if args.paths.is_empty() {
        writeln!(out, "No paths provided to collect from")?;
        return Ok(());
    }

    let outcome = collect_songs(&args.paths, args.recursive);

    match &args.json {
        Some(path) => {
            write_json(&outcome, path)?;
            writeln!(out, "Wrote to {}", path.display())?;
        }
        None => print_outcome(outcome, out)?,
    }

    Ok(())
}

/// Walk the paths and gather every song in saves and `.lsdsng`s.
pub fn collect_songs(paths: &[PathBuf], recursive: bool) -> Outcome {
    let mut outcome = Outcome::default();

    for path in iter_files(paths, recursive, &["sav", "lsdsng"]) {
        if has_extension(&path, "sav") {
            let sram = match SRam::from_path(&path) {
                Ok(sram) => sram,
                Err(error) => {
                    tracing::warn!(path = %path.display(), %error, "skipping unreadable save");
                    continue;
                }
            };

            for file in sram.filesystem.files().flatten() {
                let source = Source::Sav {
                    path: path.clone(),
                    index: usize::from(file.index()),
                };
                outcome.add(&file, source);
            }
        } else {
            match LsdSng::from_path(&path) {
                Ok(lsdsng) => outcome.add(&lsdsng, Source::LsdSng { path }),
                Err(error) => {
                    tracing::warn!(path = %path.display(), %error, "skipping unreadable song");
                }
            }
        }
    }

    outcome
}

impl Outcome {
    fn add(&mut self, file: &impl File, source: Source) {
        let name = match file.name() {
            Ok(name) => name,
            Err(error) => {
                tracing::warn!(%source, %error, "invalid song name");
                self.errors.push(source);
                return;
            }
        };

        match file.decompress() {
            Ok(song) => {
                let instance = Instance {
                    version: file.version(),
                    sha256: Sha256::digest(song.as_slice()).into(),
                    source,
                };
                self.songs
                    .entry(name.as_str().to_owned())
                    .or_default()
                    .push(instance);
            }
            Err(error) => {
                tracing::warn!(%source, %error, "could not decompress song");
                self.errors.push(source);
            }
        }
    }
}

fn write_json(outcome: &Outcome, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Could not create folder at {}", parent.display()))?;
    }

    let file = std::fs::File::create(path)
        .with_context(|| format!("Could not create file at {}", path.display()))?;

    serde_json::to_writer_pretty(file, outcome).context("Could not write the JSON")
}

fn print_outcome<W>(outcome: Outcome, mut out: W) -> Result<()>
where
    W: Write,
{
    for source in &outcome.errors {
        writeln!(out, "Could not decompress {source}")?;
    }

    for (position, (name, mut instances)) in outcome.songs.into_iter().enumerate() {
        if position > 0 {
            writeln!(out)?;
        }
        writeln!(out, "{name}")?;

        // Newest first
        instances.sort_by_key(|instance| Reverse(instance.version));

        let len = unique_prefix_len(instances.iter().map(|instance| &instance.sha256));
        for instance in instances {
            let sha = hex::encode(&instance.sha256[..len]);
            writeln!(out, "  v{:03} {sha} {}", instance.version, instance.source)?;
        }
    }

    Ok(())
}

/// The number of leading bytes needed to tell all distinct hashes apart
pub fn unique_prefix_len<'a, I>(hashes: I) -> usize
where
    I: IntoIterator<Item = &'a [u8; 32]>,
{
    let hashes: BTreeSet<&[u8; 32]> = hashes.into_iter().collect();

    (1..32)
        .find(|&len| {
            let prefixes: BTreeSet<&[u8]> = hashes.iter().map(|hash| &hash[..len]).collect();
            prefixes.len() == hashes.len()
        })
        .unwrap_or(32)
}

fn serialize_hex<S>(bytes: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&hex::encode(bytes))
}
