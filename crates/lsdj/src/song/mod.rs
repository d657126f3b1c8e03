//! Uncompressed LSDJ song data

mod memory;

pub use memory::SongMemory;

/// The instrument LSDJ initializes every instrument slot with.
///
/// The compression codec encodes runs of it with a dedicated command.
pub const DEFAULT_INSTRUMENT: [u8; 16] = [
    0xA8, 0x00, 0x00, 0xFF, 0x00, 0x00, 0x03, 0x00, 0x00, 0xD0, 0x00, 0x00, 0x00, 0xF3, 0x00, 0x00,
];

/// The wave frame LSDJ initializes every synth wave with.
///
/// The compression codec encodes runs of it with a dedicated command.
pub const DEFAULT_WAVE: [u8; 16] = [
    0x8E, 0xCD, 0xCC, 0xBB, 0xAA, 0xA9, 0x99, 0x88, 0x87, 0x76, 0x66, 0x55, 0x54, 0x43, 0x32, 0x31,
];
