//! # LSDJ
//!
//! Reading and writing data for [LittleSoundDJ](https://www.littlesounddj.com),
//! a music tracker for the original Game Boy.
//!
//! LSDJ keeps its songs in the cartridge's battery-backed memory (SRAM): one
//! song being edited in working memory, plus a filesystem of up to 32
//! compressed songs. This crate reads and writes those saves, compresses and
//! decompresses songs, exports them as `.lsdsng` files and parses the sample
//! kits stored in the ROM.
//!
//! ## Layout
//!
//! - [`sram`]: whole `.sav` files
//! - [`fs`]: the filesystem of compressed songs
//! - [`song`]: uncompressed song memory
//! - [`serde`]: the block compression codec
//! - [`lsdsng`]: single exported songs
//! - [`kit`]: sample kits
//! - [`name`]: names made of LSDJ characters
//!
//! ## Example
//!
//! ```
//! use lsdj::fs::{File, Index};
//! use lsdj::song::SongMemory;
//! use lsdj::sram::SRam;
//!
//! let mut sram = SRam::new();
//! let index = Index::new(0).unwrap();
//!
//! sram.filesystem
//!     .insert_file(index, &"HONEY".parse().unwrap(), 0x1F, &sram.working_memory_song)
//!     .unwrap();
//!
//! let mut bytes = Vec::new();
//! sram.to_writer(&mut bytes).unwrap();
//! assert_eq!(bytes.len(), SRam::LEN);
//!
//! let sram = SRam::from_reader(bytes.as_slice()).unwrap();
//! let file = sram.filesystem.file(index).unwrap();
//! assert_eq!(file.name().unwrap().as_str(), "HONEY");
//! assert_eq!(file.decompress().unwrap(), SongMemory::new());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod fs;
pub mod kit;
pub mod lsdsng;
pub mod name;
pub mod serde;
pub mod song;
pub mod sram;

// Re-export main types
pub use error::{
    CompressBlockError, FileToLsdSngError, FilesystemError, IndexError, KitError, LsdSngError,
    NameError, ReadSongError, SRamError, SongMemoryError,
};
pub use fs::{File, Filesystem, Index};
pub use kit::{Kit, Sample};
pub use lsdsng::LsdSng;
pub use name::Name;
pub use song::SongMemory;
pub use sram::SRam;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
