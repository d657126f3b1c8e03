//! The LSDJ filesystem
//!
//! Every [`SRam`](crate::sram::SRam) carries a filesystem in which songs that
//! are not currently being edited are stored in compressed form. You rarely
//! need to construct one yourself; load an SRAM and use its
//! [`filesystem`](crate::sram::SRam::filesystem) field instead.

mod filesystem;
mod index;

pub use filesystem::{Entries, Entry, Filesystem};
pub use index::Index;

use crate::error::{FileToLsdSngError, NameError, ReadSongError};
use crate::lsdsng::LsdSng;
use crate::name::Name;
use crate::song::SongMemory;

/// A named, versioned and compressed song.
///
/// Files live in a [`Filesystem`], but artists also export them to disk as
/// [`LsdSng`]s, which is why both implement this trait.
pub trait File {
    /// The name of the song
    fn name(&self) -> Result<Name<8>, NameError>;

    /// The version of the song, increased by LSDJ with every save
    fn version(&self) -> u8;

    /// Decompress the song data
    fn decompress(&self) -> Result<SongMemory, ReadSongError>;

    /// Combine name, version and song into an [`LsdSng`].
    fn lsdsng(&self) -> Result<LsdSng, FileToLsdSngError> {
        let name = self.name()?;
        let song = self.decompress()?;

        Ok(LsdSng::from_song(name, self.version(), &song)?)
    }
}
