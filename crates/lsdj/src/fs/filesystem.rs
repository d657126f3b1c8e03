use std::io::{self, Cursor, Read, Write};
use std::ops::Range;

use super::{File, Index};
use crate::error::{
    CompressBlockError, FileToLsdSngError, FilesystemError, NameError, ReadSongError,
};
use crate::lsdsng::LsdSng;
use crate::name::Name;
use crate::serde::{compress_block, decompress_block, End, SongWriter};
use crate::song::SongMemory;

const FILE_NAME_LEN: usize = 8;
const FILE_VERSIONS: Range<usize> = 0x0100..0x0120;
const CHECK: Range<usize> = 0x013E..0x0140;
const CHECK_VALUE: [u8; 2] = [0x6A, 0x6B];
const ACTIVE_FILE: usize = 0x0140;
const NO_ACTIVE_FILE: u8 = 0xFF;
const ALLOC_TABLE: Range<usize> = 0x0141..0x0200;
const UNUSED_BLOCK: u8 = 0xFF;

/// Storage for up to 32 compressed [`File`]s.
///
/// The filesystem is made of 192 blocks of 512 bytes. Block 0 holds the
/// metadata:
///
/// ```text
/// 0x000..0x100   32 file names of 8 bytes
/// 0x100..0x120   32 file versions
/// 0x13E..0x140   "jk" initialization check
/// 0x140          active file, FF if none
/// 0x141..0x200   allocation table: entry i owns block i + 1, FF if free
/// ```
///
/// A file slot is in use exactly when at least one block is allocated to it.
///
/// # Example
///
/// ```
/// use lsdj::fs::{File, Filesystem, Index};
/// use lsdj::song::SongMemory;
///
/// let mut filesystem = Filesystem::new();
/// let index = Index::new(3).unwrap();
///
/// filesystem
///     .insert_file(index, &"CACTUAR".parse().unwrap(), 0x2E, &SongMemory::new())
///     .unwrap();
///
/// let file = filesystem.file(index).unwrap();
/// assert_eq!(file.name().unwrap().as_str(), "CACTUAR");
/// assert_eq!(file.version(), 0x2E);
/// assert_eq!(file.decompress().unwrap(), SongMemory::new());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Filesystem {
    bytes: [u8; Self::LEN],
}

impl Filesystem {
    /// The maximum number of files
    pub const FILES_CAPACITY: usize = 0x20;

    /// The number of blocks, including the metadata block
    pub const BLOCKS_CAPACITY: usize = 0xC0;

    /// The length in bytes of a single block
    pub const BLOCK_LEN: usize = 0x200;

    /// The length in bytes of the entire filesystem
    pub const LEN: usize = Self::BLOCK_LEN * Self::BLOCKS_CAPACITY;

    /// Create an empty filesystem with its verification bytes set.
    pub fn new() -> Self {
        let mut bytes = [0; Self::LEN];

        bytes[CHECK].copy_from_slice(&CHECK_VALUE);
        bytes[ACTIVE_FILE] = NO_ACTIVE_FILE;
        bytes[ALLOC_TABLE].fill(UNUSED_BLOCK);

        Self { bytes }
    }

    /// Read a filesystem from an I/O reader.
    pub fn from_reader<R>(mut reader: R) -> Result<Self, FilesystemError>
    where
        R: Read,
    {
        let mut bytes = [0; Self::LEN];
        reader.read_exact(&mut bytes)?;

        if bytes[CHECK] != CHECK_VALUE {
            return Err(FilesystemError::InitializationCheckIncorrect);
        }

        Ok(Self { bytes })
    }

    /// Write the filesystem to an I/O writer.
    pub fn to_writer<W>(&self, mut writer: W) -> io::Result<()>
    where
        W: Write,
    {
        writer.write_all(&self.bytes)
    }

    /// Whether any blocks are allocated to the file slot
    pub fn is_file_in_use(&self, index: Index) -> bool {
        self.alloc_table().contains(&index.value())
    }

    /// The file at a slot, or [`None`] if the slot is empty
    pub fn file(&self, index: Index) -> Option<Entry<'_>> {
        self.is_file_in_use(index).then_some(Entry { fs: self, index })
    }

    /// Iterate over all 32 file slots.
    pub fn files(&self) -> Entries<'_> {
        Entries { fs: self, next: 0 }
    }

    /// Compress a song into the filesystem.
    ///
    /// Blocks are taken in ascending order from the free blocks and those
    /// already owned by the slot. If they do not suffice nothing is modified
    /// and [`CompressBlockError::NoBlockLeft`] is returned.
    ///
    /// A file previously stored at the slot is removed and returned.
    pub fn insert_file(
        &mut self,
        index: Index,
        name: &Name<8>,
        version: u8,
        song: &SongMemory,
    ) -> Result<Option<LsdSng>, CompressBlockError> {
        let file = index.value();

        // Compress into scratch blocks first, so running out of space leaves
        // the filesystem untouched
        let available: Vec<u8> = self
            .alloc_table()
            .iter()
            .zip(1..)
            .filter(|&(&owner, _)| owner == UNUSED_BLOCK || owner == file)
            .map(|(_, block)| block)
            .collect();
        let mut available = available.into_iter().peekable();

        let mut reader = Cursor::new(song.as_slice());
        let mut blocks = Vec::new();

        loop {
            let block = available.next().ok_or(CompressBlockError::NoBlockLeft)?;
            let mut bytes = [0; Self::BLOCK_LEN];
            let end = compress_block(&mut reader, &mut bytes, || available.peek().copied())?;

            blocks.push((block, bytes));

            if end == End::EndOfFile {
                break;
            }
        }

        let old = self.remove_file(index);

        self.file_name_mut(index).copy_from_slice(name.bytes());
        self.bytes[version_offset(index)] = version;

        for (block, bytes) in &blocks {
            self.alloc_table_mut()[usize::from(*block) - 1] = file;
            self.block_mut(*block).copy_from_slice(bytes);
        }

        tracing::debug!(
            file,
            name = %name,
            version,
            blocks = blocks.len(),
            replaced = old.is_some(),
            "inserted file"
        );

        Ok(old)
    }

    /// Remove a file, returning it if the slot was in use.
    pub fn remove_file(&mut self, index: Index) -> Option<LsdSng> {
        if !self.is_file_in_use(index) {
            return None;
        }

        let name = Name::from_bytes(self.file_name(index)).unwrap_or_default();
        self.file_name_mut(index).fill(0);

        let version = std::mem::replace(&mut self.bytes[version_offset(index)], 0);

        let owned = self.file_blocks(index);
        let mut blocks = Vec::with_capacity(owned.len() * Self::BLOCK_LEN);
        for block in &owned {
            blocks.extend_from_slice(self.block(*block));
            self.block_mut(*block).fill(0);
            self.alloc_table_mut()[usize::from(*block) - 1] = UNUSED_BLOCK;
        }

        tracing::debug!(file = index.value(), blocks = owned.len(), "removed file");

        Some(LsdSng::new(name, version, blocks))
    }

    /// The file the working memory song was loaded from
    pub fn active_file(&self) -> Option<Index> {
        match self.bytes[ACTIVE_FILE] {
            NO_ACTIVE_FILE => None,
            index => Index::new(index).ok(),
        }
    }

    /// Mark which file the working memory song belongs to.
    pub fn set_active_file(&mut self, index: Option<Index>) {
        self.bytes[ACTIVE_FILE] = index.map_or(NO_ACTIVE_FILE, Index::value);
    }

    /// The number of blocks allocated to files
    pub fn blocks_used_count(&self) -> usize {
        self.alloc_table()
            .iter()
            .filter(|&&owner| owner != UNUSED_BLOCK)
            .count()
    }

    /// The number of blocks still available to files
    pub fn blocks_free_count(&self) -> usize {
        self.alloc_table().len() - self.blocks_used_count()
    }

    /// Decompress the chain of blocks starting at `first`
    fn decompress_from(&self, first: u8) -> Result<SongMemory, ReadSongError> {
        let mut writer = SongWriter::new();
        self.follow_chain(first, &mut writer)?;
        writer.finish()
    }

    fn follow_chain<W>(&self, first: u8, mut writer: W) -> Result<(), ReadSongError>
    where
        W: Write,
    {
        let mut block = first;

        // A chain can visit every block at most once
        for _ in 1..Self::BLOCKS_CAPACITY {
            let start = Self::block_start(block).ok_or(ReadSongError::InvalidBlockJump(block))?;

            match decompress_block(&self.bytes[start..], &mut writer)? {
                End::EndOfFile => return Ok(()),
                End::JumpToBlock(next) => block = next,
            }
        }

        Err(ReadSongError::UnterminatedBlockChain)
    }

    /// The offset of a data block, or [`None`] for block 0 and beyond the end
    fn block_start(block: u8) -> Option<usize> {
        let block = usize::from(block);
        (1..Self::BLOCKS_CAPACITY)
            .contains(&block)
            .then_some(block * Self::BLOCK_LEN)
    }

    // Only called with blocks taken from the allocation table
    fn block(&self, block: u8) -> &[u8] {
        let offset = usize::from(block) * Self::BLOCK_LEN;
        &self.bytes[offset..offset + Self::BLOCK_LEN]
    }

    fn block_mut(&mut self, block: u8) -> &mut [u8] {
        let offset = usize::from(block) * Self::BLOCK_LEN;
        &mut self.bytes[offset..offset + Self::BLOCK_LEN]
    }

    fn alloc_table(&self) -> &[u8] {
        &self.bytes[ALLOC_TABLE]
    }

    fn alloc_table_mut(&mut self) -> &mut [u8] {
        &mut self.bytes[ALLOC_TABLE]
    }

    fn file_name(&self, index: Index) -> &[u8] {
        let offset = usize::from(index) * FILE_NAME_LEN;
        &self.bytes[offset..offset + FILE_NAME_LEN]
    }

    fn file_name_mut(&mut self, index: Index) -> &mut [u8] {
        let offset = usize::from(index) * FILE_NAME_LEN;
        &mut self.bytes[offset..offset + FILE_NAME_LEN]
    }

    /// The blocks owned by a file, in ascending order
    fn file_blocks(&self, index: Index) -> Vec<u8> {
        self.alloc_table()
            .iter()
            .zip(1..)
            .filter(|&(&owner, _)| owner == index.value())
            .map(|(_, block)| block)
            .collect()
    }
}

fn version_offset(index: Index) -> usize {
    FILE_VERSIONS.start + usize::from(index)
}

impl Default for Filesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Filesystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Filesystem")
            .field("active_file", &self.active_file())
            .field("blocks_used", &self.blocks_used_count())
            .finish_non_exhaustive()
    }
}

/// Iterator over every file slot of a [`Filesystem`]
pub struct Entries<'a> {
    fs: &'a Filesystem,
    next: usize,
}

impl<'a> Iterator for Entries<'a> {
    type Item = Option<Entry<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        let index = Index::try_from(self.next).ok()?;
        self.next += 1;
        Some(self.fs.file(index))
    }
}

/// A file stored in a [`Filesystem`]
#[derive(Debug, Clone, Copy)]
pub struct Entry<'a> {
    fs: &'a Filesystem,
    index: Index,
}

impl Entry<'_> {
    /// The slot the file is stored in
    pub fn index(&self) -> Index {
        self.index
    }

    /// The number of blocks the compressed file takes up
    pub fn block_count(&self) -> usize {
        self.fs.file_blocks(self.index).len()
    }
}

impl File for Entry<'_> {
    fn name(&self) -> Result<Name<8>, NameError> {
        Name::from_bytes(self.fs.file_name(self.index))
    }

    fn version(&self) -> u8 {
        self.fs.bytes[version_offset(self.index)]
    }

    fn decompress(&self) -> Result<SongMemory, ReadSongError> {
        let first = self
            .fs
            .file_blocks(self.index)
            .first()
            .copied()
            .ok_or(ReadSongError::NoBlocks(self.index.value()))?;

        self.fs.decompress_from(first)
    }

    /// Copies the raw blocks; the song is not recompressed.
    fn lsdsng(&self) -> Result<LsdSng, FileToLsdSngError> {
        let name = self.name()?;

        let owned = self.fs.file_blocks(self.index);
        let mut blocks = Vec::with_capacity(owned.len() * Filesystem::BLOCK_LEN);
        for block in owned {
            blocks.extend_from_slice(self.fs.block(block));
        }

        Ok(LsdSng::new(name, self.version(), blocks))
    }
}
