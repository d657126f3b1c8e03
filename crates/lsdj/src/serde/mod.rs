//! The LSDJ block compression codec
//!
//! Songs are stored in 512-byte blocks using a mix of run-length encoding and
//! dedicated commands for LSDJ's default instrument and wave data. See the
//! [File Management Structure](https://littlesounddj.fandom.com/wiki/File_Management_Structure)
//! for the reference description.
//!
//! # Encoding
//!
//! ```text
//! C0 C0      literal C0
//! C0 v n     n times byte v
//! E0 E0      literal E0
//! E0 F0 n    n times the default wave
//! E0 F1 n    n times the default instrument
//! E0 FF      end of file
//! E0 b       continue in block b
//! ..         any other byte is copied literally
//! ```

mod compress;
mod decompress;
mod song_writer;

pub use compress::compress_block;
pub use decompress::decompress_block;
pub(crate) use song_writer::SongWriter;

pub(crate) const RLE_BYTE: u8 = 0xC0;
pub(crate) const CMD_BYTE: u8 = 0xE0;
pub(crate) const DEFAULT_WAVE_BYTE: u8 = 0xF0;
pub(crate) const DEFAULT_INSTRUMENT_BYTE: u8 = 0xF1;
pub(crate) const EOF_BYTE: u8 = 0xFF;

/// How a compressed block ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum End {
    /// A block-jump command was written/read
    JumpToBlock(u8),

    /// An end-of-file command was written/read
    EndOfFile,
}
