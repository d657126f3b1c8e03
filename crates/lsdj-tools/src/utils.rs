//! Helpers shared by the subcommands

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::{DirEntry, WalkDir};

/// Walk `paths` for files with one of the given extensions.
///
/// Files are yielded as-is, folders are walked one level deep unless
/// `recursive` is set. Hidden entries and unreadable paths are skipped.
pub fn iter_files<I, P>(paths: I, recursive: bool, extensions: &[&str]) -> Vec<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut files = Vec::new();

    for path in paths {
        let mut walk_dir = WalkDir::new(path.as_ref()).sort_by_file_name();
        if !recursive {
            walk_dir = walk_dir.max_depth(1);
        }

        let entries = walk_dir
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

        for entry in entries {
            match entry {
                Ok(entry) if entry.file_type().is_file() => {
                    if extensions
                        .iter()
                        .any(|extension| has_extension(entry.path(), extension))
                    {
                        files.push(entry.into_path());
                    }
                }
                Ok(_) => (),
                Err(error) => tracing::warn!(%error, "skipping unreadable path"),
            }
        }
    }

    files
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

/// Whether the path ends in `.<extension>`, ignoring case
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

/// Ask on stdin whether an existing file may be overwritten.
///
/// Returns `true` right away when the file doesn't exist or `yes` is set.
pub fn confirm_overwrite(path: &Path, yes: bool) -> Result<bool> {
    if yes || !path.exists() {
        return Ok(true);
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    ask_overwrite(path, stdin.lock(), stdout.lock())
}

/// Prompt until the answer is `y` or `n`; end of input counts as `n`.
pub fn ask_overwrite<R, W>(path: &Path, mut input: R, mut output: W) -> Result<bool>
where
    R: BufRead,
    W: Write,
{
    loop {
        write!(
            output,
            "{} already exists. Do you want to overwrite it? [y/n] ",
            path.display()
        )?;
        output.flush()?;

        let mut line = String::new();
        let read = input
            .read_line(&mut line)
            .context("Could not read terminal input")?;

        if read == 0 {
            return Ok(false);
        }

        match line.trim() {
            "y" | "Y" => return Ok(true),
            "n" | "N" => return Ok(false),
            _ => (),
        }
    }
}
