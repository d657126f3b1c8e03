//! The `.lsdsng` song format

use std::io::{self, Cursor, Read, Write};
use std::path::Path;

use crate::error::{CompressBlockError, FileToLsdSngError, LsdSngError, NameError, ReadSongError};
use crate::fs::{File, Filesystem};
use crate::name::Name;
use crate::serde::{compress_block, decompress_block, End, SongWriter};
use crate::song::SongMemory;

/// A single exported song: a [`Name`], a version and compressed [`SongMemory`].
///
/// Because an SRAM holds many songs, artists exchange them as `.lsdsng`
/// files. The format is a stripped down filesystem:
///
/// ```text
/// 0x0..0x8   name
/// 0x8        version
/// 0x9..      compressed blocks of 512 bytes
/// ```
///
/// The blocks are copied linearly from the filesystem they were exported
/// from, so block-jump targets are meaningless and ignored when decompressing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LsdSng {
    /// The name of the song
    pub name: Name<8>,

    /// The version of the song, increased with every save
    pub version: u8,

    blocks: Vec<u8>,
}

impl LsdSng {
    pub(crate) fn new(name: Name<8>, version: u8, blocks: Vec<u8>) -> Self {
        Self {
            name,
            version,
            blocks,
        }
    }

    /// Compress a song into a new [`LsdSng`].
    pub fn from_song(
        name: Name<8>,
        version: u8,
        song: &SongMemory,
    ) -> Result<Self, CompressBlockError> {
        let mut reader = Cursor::new(song.as_slice());
        let mut blocks = Vec::new();

        loop {
            // Number the blocks as if they were stored from block 1 onward
            let next = u8::try_from(blocks.len() / Filesystem::BLOCK_LEN + 2).ok();

            let mut block = [0; Filesystem::BLOCK_LEN];
            let end = compress_block(&mut reader, &mut block, || next)?;
            blocks.extend_from_slice(&block);

            if end == End::EndOfFile {
                break;
            }
        }

        Ok(Self::new(name, version, blocks))
    }

    /// Read an [`LsdSng`] from an I/O reader.
    pub fn from_reader<R>(mut reader: R) -> Result<Self, LsdSngError>
    where
        R: Read,
    {
        let mut header = [0; 9];
        reader.read_exact(&mut header)?;

        let name = Name::from_bytes(&header[..8])?;
        let version = header[8];

        let mut blocks = Vec::new();
        reader.read_to_end(&mut blocks)?;

        Ok(Self::new(name, version, blocks))
    }

    /// Read an [`LsdSng`] from a file on disk.
    pub fn from_path<P>(path: P) -> Result<Self, LsdSngError>
    where
        P: AsRef<Path>,
    {
        let file = std::fs::File::open(path)?;
        Self::from_reader(io::BufReader::new(file))
    }

    /// Write the [`LsdSng`] to an I/O writer.
    pub fn to_writer<W>(&self, mut writer: W) -> io::Result<()>
    where
        W: Write,
    {
        writer.write_all(self.name.bytes())?;
        writer.write_all(&[self.version])?;
        writer.write_all(&self.blocks)
    }

    /// Write the [`LsdSng`] to a file on disk.
    pub fn to_path<P>(&self, path: P) -> io::Result<()>
    where
        P: AsRef<Path>,
    {
        let mut writer = io::BufWriter::new(std::fs::File::create(path)?);
        self.to_writer(&mut writer)?;
        writer.flush()
    }

    /// The raw compressed blocks
    pub fn blocks(&self) -> &[u8] {
        &self.blocks
    }

    /// The number of (possibly partial) blocks
    pub fn block_count(&self) -> usize {
        self.blocks.len().div_ceil(Filesystem::BLOCK_LEN)
    }
}

impl File for LsdSng {
    fn name(&self) -> Result<Name<8>, NameError> {
        Ok(self.name.clone())
    }

    fn version(&self) -> u8 {
        self.version
    }

    fn decompress(&self) -> Result<SongMemory, ReadSongError> {
        let mut writer = SongWriter::new();

        for offset in (0..self.blocks.len()).step_by(Filesystem::BLOCK_LEN) {
            if decompress_block(&self.blocks[offset..], &mut writer)? == End::EndOfFile {
                return writer.finish();
            }
        }

        Err(ReadSongError::UnterminatedBlockChain)
    }

    fn lsdsng(&self) -> Result<LsdSng, FileToLsdSngError> {
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn name(value: &str) -> Name<8> {
        value.parse().unwrap()
    }

    #[test]
    fn test_from_song() {
        let song = SongMemory::new();
        let lsdsng = LsdSng::from_song(name("EMPTY"), 4, &song).unwrap();

        assert_eq!(lsdsng.blocks().len() % Filesystem::BLOCK_LEN, 0);
        assert!(lsdsng.block_count() >= 1);
        assert_eq!(lsdsng.decompress().unwrap(), song);
    }

    #[test]
    fn test_reader_writer() {
        let lsdsng = LsdSng::from_song(name("HONEY"), 0x1F, &SongMemory::new()).unwrap();

        let mut bytes = Vec::new();
        lsdsng.to_writer(&mut bytes).unwrap();
        assert_eq!(&bytes[..9], b"HONEY\0\0\0\x1F");
        assert_eq!(bytes.len(), 9 + lsdsng.blocks().len());

        let read = LsdSng::from_reader(bytes.as_slice()).unwrap();
        assert_eq!(read, lsdsng);
    }

    #[test]
    fn test_invalid_name() {
        let mut bytes = b"honey\0\0\0\x01".to_vec();
        bytes.extend_from_slice(&[0xE0, 0xFF]);

        assert!(matches!(
            LsdSng::from_reader(bytes.as_slice()),
            Err(LsdSngError::Name(NameError::InvalidByte { byte: b'h', index: 0 }))
        ));
    }

    #[test]
    fn test_truncated_header() {
        assert!(matches!(
            LsdSng::from_reader([0x41, 0x42].as_slice()),
            Err(LsdSngError::Io(_))
        ));
    }

    #[test]
    fn test_decompress_ignores_jump_targets() {
        let mut song = SongMemory::new();
        for (offset, byte) in song.as_mut_slice()[..0x1000].iter_mut().enumerate() {
            *byte = (offset % 3) as u8 + 1;
        }

        let lsdsng = LsdSng::from_song(name("JUMPS"), 0, &song).unwrap();
        assert!(lsdsng.block_count() > 1);

        // Scramble every jump target; decompression must not care
        let mut blocks = lsdsng.blocks().to_vec();
        for block in blocks.chunks_mut(Filesystem::BLOCK_LEN) {
            if let Some(position) = block.windows(2).rposition(|pair| pair[0] == 0xE0) {
                if block[position + 1] != 0xFF && block[position + 1] != 0xE0 {
                    block[position + 1] = 0x99;
                }
            }
        }

        let scrambled = LsdSng::new(lsdsng.name.clone(), 0, blocks);
        assert_eq!(scrambled.decompress().unwrap(), song);
    }

    #[test]
    fn test_unterminated() {
        let lsdsng = LsdSng::new(name("BROKEN"), 0, vec![0x01, 0xE0, 0x05]);
        assert!(matches!(
            lsdsng.decompress(),
            Err(ReadSongError::UnterminatedBlockChain)
        ));
    }

    #[test]
    fn test_oversized_song() {
        let mut blocks: Vec<u8> = [0xC0, 0x01, 0xFF].repeat(150);
        blocks.extend_from_slice(&[0xE0, 0xFF]);

        let lsdsng = LsdSng::new(name("HUGE"), 0, blocks);
        assert!(matches!(
            lsdsng.decompress(),
            Err(ReadSongError::SizeMismatch { len: 38250 })
        ));
    }

    #[test]
    fn test_path_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.lsdsng");

        let lsdsng = LsdSng::from_song(name("DISK"), 9, &SongMemory::new()).unwrap();
        lsdsng.to_path(&path).unwrap();

        assert_eq!(LsdSng::from_path(&path).unwrap(), lsdsng);
    }
}
