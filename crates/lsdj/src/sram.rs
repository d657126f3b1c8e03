//! LSDJ save files (SRAM)

use std::io::{self, Read, Write};
use std::path::Path;

use crate::error::SRamError;
use crate::fs::Filesystem;
use crate::song::SongMemory;

/// The battery-backed memory of an LSDJ cartridge, as found in `.sav` files.
///
/// SRAM holds the song currently being edited, uncompressed, followed by a
/// [`Filesystem`] with compressed songs.
///
/// ```text
/// 0x00000..0x08000   working memory song
/// 0x08000..0x20000   filesystem
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SRam {
    /// The song being edited
    pub working_memory_song: SongMemory,

    /// Storage for songs that are not being edited
    pub filesystem: Filesystem,
}

impl SRam {
    /// The length in bytes of a full save
    pub const LEN: usize = SongMemory::LEN + Filesystem::LEN;

    /// Create SRAM with an empty working memory song and filesystem.
    pub fn new() -> Self {
        Self {
            working_memory_song: SongMemory::new(),
            filesystem: Filesystem::new(),
        }
    }

    /// Read SRAM from an I/O reader.
    pub fn from_reader<R>(mut reader: R) -> Result<Self, SRamError>
    where
        R: Read,
    {
        let mut song = vec![0; SongMemory::LEN];
        reader.read_exact(&mut song)?;
        let working_memory_song = SongMemory::try_from(song.as_slice())?;

        let filesystem = Filesystem::from_reader(reader)?;

        Ok(Self {
            working_memory_song,
            filesystem,
        })
    }

    /// Read SRAM from a `.sav` file on disk.
    pub fn from_path<P>(path: P) -> Result<Self, SRamError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "reading SRAM");

        let file = std::fs::File::open(path)?;
        Self::from_reader(io::BufReader::new(file))
    }

    /// Write the SRAM to an I/O writer.
    pub fn to_writer<W>(&self, mut writer: W) -> io::Result<()>
    where
        W: Write,
    {
        self.working_memory_song.to_writer(&mut writer)?;
        self.filesystem.to_writer(&mut writer)
    }

    /// Write the SRAM to a `.sav` file on disk.
    pub fn to_path<P>(&self, path: P) -> io::Result<()>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "writing SRAM");

        let mut writer = io::BufWriter::new(std::fs::File::create(path)?);
        self.to_writer(&mut writer)?;
        writer.flush()
    }
}
