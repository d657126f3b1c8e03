//! Error types for reading and writing LSDJ data

use std::io;
use thiserror::Error;

/// Errors converting bytes or text into a [`Name`](crate::name::Name)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    /// The source does not fit in the name's capacity
    #[error("Name of {len} bytes does not fit in {capacity} characters")]
    TooLong {
        /// Length of the rejected source
        len: usize,
        /// Maximum number of characters in the name
        capacity: usize,
    },

    /// A character outside of `A-Z`, `0-9`, space and `x` was found
    #[error("Byte {byte} at position {index} is not allowed as a name character")]
    InvalidByte {
        /// The offending byte
        byte: u8,
        /// Where in the source it was found
        index: usize,
    },
}

/// Errors converting a number into a filesystem [`Index`](crate::fs::Index)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("File index {0} is out of range (0-31)")]
pub struct IndexError(pub usize);

/// Errors validating raw bytes as [`SongMemory`](crate::song::SongMemory)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SongMemoryError {
    /// The number of bytes isn't exactly one song
    #[error("Song memory must be 0x8000 bytes, got {len:#x}")]
    IncorrectSize {
        /// Number of bytes provided
        len: usize,
    },

    /// None of the "rb" verification markers were found
    #[error("The song memory initialization check failed")]
    InitializationCheckIncorrect,
}

/// Errors reading or decompressing a song
#[derive(Error, Debug)]
pub enum ReadSongError {
    /// Reading, writing or seeking failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The resulting bytes are not valid song memory
    #[error("Invalid song memory: {0}")]
    SongMemory(#[from] SongMemoryError),

    /// Decompression produced too few or too many bytes for a song
    #[error("Decompressed {len:#x} bytes, expected 0x8000")]
    SizeMismatch {
        /// Number of bytes produced
        len: u64,
    },

    /// A block-jump command points outside of the filesystem
    #[error("Block jump to invalid block {0}")]
    InvalidBlockJump(u8),

    /// The block chain never reaches an end-of-file command
    #[error("Block chain does not terminate")]
    UnterminatedBlockChain,

    /// The file slot has no blocks allocated to it
    #[error("File {0} has no blocks allocated")]
    NoBlocks(u8),
}

/// Errors compressing song memory into blocks
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompressBlockError {
    /// There are no more free blocks to continue into
    #[error("The filesystem ran out of blocks")]
    NoBlockLeft,

    /// The destination block cannot hold a compression step and its terminator
    #[error("Block of {len} bytes is too small to compress into")]
    BlockTooSmall {
        /// Size of the destination block
        len: usize,
    },
}

/// Errors reading a [`Filesystem`](crate::fs::Filesystem)
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// The "jk" verification bytes were not found
    #[error("The filesystem initialization check failed")]
    InitializationCheckIncorrect,

    /// Reading failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Errors converting a [`File`](crate::fs::File) to an [`LsdSng`](crate::lsdsng::LsdSng)
#[derive(Error, Debug)]
pub enum FileToLsdSngError {
    /// The stored name is invalid
    #[error("Invalid file name: {0}")]
    Name(#[from] NameError),

    /// Decompressing the song failed
    #[error("Decompressing the song failed: {0}")]
    Decompress(#[from] ReadSongError),

    /// (Re)compressing the song failed
    #[error("Compressing the song failed: {0}")]
    Compress(#[from] CompressBlockError),
}

/// Errors reading an [`LsdSng`](crate::lsdsng::LsdSng)
#[derive(Error, Debug)]
pub enum LsdSngError {
    /// Opening or reading failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The header holds an invalid name
    #[error("Invalid song name: {0}")]
    Name(#[from] NameError),
}

/// Errors reading [`SRam`](crate::sram::SRam)
#[derive(Error, Debug)]
pub enum SRamError {
    /// Opening or reading failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The working memory song is invalid
    #[error("Invalid working memory song: {0}")]
    WorkingMemory(#[from] SongMemoryError),

    /// The filesystem is invalid
    #[error("Invalid filesystem: {0}")]
    Filesystem(#[from] FilesystemError),
}

/// Errors reading a sample [`Kit`](crate::kit::Kit)
#[derive(Error, Debug)]
pub enum KitError {
    /// Opening or reading failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A kit is exactly one ROM bank
    #[error("Kit must be 0x4000 bytes, got {len:#x}")]
    IncorrectSize {
        /// Number of bytes provided
        len: usize,
    },

    /// The bank does not start with the kit marker
    #[error("Invalid kit header: {0:#04x} {1:#04x}")]
    InvalidHeader(u8, u8),

    /// The kit name is not valid text
    #[error("The kit name is invalid")]
    InvalidName,

    /// A sample name is not valid text
    #[error("The name of sample {index} is invalid")]
    InvalidSampleName {
        /// Sample slot
        index: usize,
    },

    /// A sample's offset table entry is inconsistent
    #[error("Sample {index} has an invalid range {start:#x}..{end:#x}")]
    InvalidSampleRange {
        /// Sample slot
        index: usize,
        /// Bank-relative start offset
        start: usize,
        /// Bank-relative end offset
        end: usize,
    },
}
