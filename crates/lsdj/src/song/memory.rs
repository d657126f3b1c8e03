use std::io::{self, Read, Write};

use crate::error::{ReadSongError, SongMemoryError};

/// Offsets at which LSDJ stores its "rb" verification marker
const CHECK_OFFSETS: [usize; 3] = [0x1E78, 0x3E80, 0x7FF0];
const CHECK_VALUE: [u8; 2] = [0x72, 0x62];

const FORMAT_VERSION_OFFSET: usize = 0x7FFF;

/// A contiguous block of unparsed song data.
///
/// This is what LSDJ keeps in working memory while a song is being edited,
/// and what the filesystem and `.lsdsng` files store in compressed form.
#[derive(Clone, PartialEq, Eq)]
pub struct SongMemory {
    bytes: [u8; Self::LEN],
}

impl SongMemory {
    /// The number of bytes in a single song
    pub const LEN: usize = 0x8000;

    /// The format version written by [`SongMemory::new`] (LSDJ 9.2.L)
    pub const EMPTY_FORMAT_VERSION: u8 = 0x16;

    /// Create an empty song, ready for use by LSDJ.
    pub fn new() -> Self {
        Self {
            bytes: Self::empty_song_bytes(),
        }
    }

    /// The bytes of an empty song, with every verification byte LSDJ
    /// checks against memory corruption in place.
    pub fn empty_song_bytes() -> [u8; Self::LEN] {
        let mut bytes = [0; Self::LEN];

        bytes[0x0FF0..0x1000].fill(0xFF);
        for offset in (0x1090..0x1290).step_by(16) {
            bytes[offset..offset + 2].fill(0x06);
        }
        bytes[0x1290..0x1690].fill(0xFF);

        // Default groove names
        let mut digit = 0;
        for offset in (0x1DD0..0x1DF9).step_by(6) {
            bytes[offset..offset + 6].copy_from_slice(&[
                0x57,
                0x2D,
                0x30 + digit,
                0x57,
                0x2D,
                0x31 + digit,
            ]);
            digit += 2;
            if digit == 10 {
                digit += 7;
            }
        }

        bytes[0x1E78..0x1E7A].copy_from_slice(&CHECK_VALUE);
        bytes[0x2080..0x2880].fill(0xFF);
        bytes[0x3E80..0x3E82].copy_from_slice(&CHECK_VALUE);

        for offset in (0x3EB0..0x3FB0).step_by(16) {
            bytes[offset + 7] = 0x10;
            bytes[offset + 8] = 0xFF;
            bytes[offset + 11] = 0x10;
            bytes[offset + 12] = 0xFF;
        }

        bytes[0x3FB4] = 0x80;
        bytes[0x3FBA..0x3FBC].copy_from_slice(&[0x07, 0x02]);
        bytes[0x3FC0..0x3FC4].copy_from_slice(&[0x00, 0x20, 0x00, 0x01]);
        bytes[0x3FC6..0x3FCA].fill(0xFF);

        for offset in (0x6000..0x7000).step_by(16) {
            bytes[offset..offset + 16].copy_from_slice(&[
                0x71, 0x32, 0x33, 0x44, 0x45, 0x55, 0x66, 0x77, 0x78, 0x89, 0x99, 0xAA, 0xAB, 0xBC,
                0xCD, 0xCE,
            ]);
        }

        bytes[0x7000..0x7FF0].fill(0xFF);
        bytes[0x7FF0..0x7FF2].copy_from_slice(&CHECK_VALUE);
        bytes[FORMAT_VERSION_OFFSET] = Self::EMPTY_FORMAT_VERSION;

        bytes
    }

    /// Read and validate song memory from an I/O reader.
    pub fn from_reader<R>(mut reader: R) -> Result<Self, ReadSongError>
    where
        R: Read,
    {
        let mut bytes = [0; Self::LEN];
        reader.read_exact(&mut bytes)?;

        Ok(Self::try_from(bytes.as_slice())?)
    }

    /// Write the song memory to an I/O writer.
    pub fn to_writer<W>(&self, mut writer: W) -> io::Result<()>
    where
        W: Write,
    {
        writer.write_all(&self.bytes)
    }

    /// The version of the format the song is encoded in
    pub fn format_version(&self) -> u8 {
        self.bytes[FORMAT_VERSION_OFFSET]
    }

    /// The bytes that make up the song
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Mutable access to the bytes that make up the song
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

impl Default for SongMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SongMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SongMemory")
            .field("format_version", &self.format_version())
            .finish_non_exhaustive()
    }
}

impl TryFrom<&[u8]> for SongMemory {
    type Error = SongMemoryError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; Self::LEN] = value
            .try_into()
            .map_err(|_| SongMemoryError::IncorrectSize { len: value.len() })?;

        let initialized = CHECK_OFFSETS
            .iter()
            .any(|&offset| bytes[offset..offset + 2] == CHECK_VALUE);

        if initialized {
            Ok(Self { bytes })
        } else {
            Err(SongMemoryError::InitializationCheckIncorrect)
        }
    }
}
