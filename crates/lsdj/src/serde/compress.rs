use std::io::Cursor;

use super::{End, CMD_BYTE, DEFAULT_INSTRUMENT_BYTE, DEFAULT_WAVE_BYTE, EOF_BYTE, RLE_BYTE};
use crate::error::CompressBlockError;
use crate::song::{DEFAULT_INSTRUMENT, DEFAULT_WAVE};

/// Room needed for the largest compression step plus a two-byte terminator
const MIN_ROOM: usize = 5;

/// Compress bytes from `reader` into a single block.
///
/// The whole block is overwritten; unused space after the terminating command
/// is zero-filled. Compression stops when either:
///
///  * the reader is exhausted, which writes an end-of-file command and returns
///    [`End::EndOfFile`], or
///  * the block is full. `next_block()` is asked for the block to continue in,
///    a jump command is written and [`End::JumpToBlock`] is returned.
///
/// # Example
///
/// ```
/// use std::io::Cursor;
/// use lsdj::serde::{compress_block, End};
///
/// let mut reader = Cursor::new([4, 4, 4, 9].as_slice());
/// let mut block = [0xAA; 8];
///
/// let end = compress_block(&mut reader, &mut block, || None).unwrap();
/// assert_eq!(end, End::EndOfFile);
/// assert_eq!(block, [0xC0, 4, 3, 9, 0xE0, 0xFF, 0, 0]);
/// ```
pub fn compress_block<F>(
    reader: &mut Cursor<&[u8]>,
    block: &mut [u8],
    next_block: F,
) -> Result<End, CompressBlockError>
where
    F: FnOnce() -> Option<u8>,
{
    if block.len() < MIN_ROOM {
        return Err(CompressBlockError::BlockTooSmall { len: block.len() });
    }

    block.fill(0);
    let mut written = 0;

    loop {
        if remaining(reader).is_empty() {
            block[written..written + 2].copy_from_slice(&[CMD_BYTE, EOF_BYTE]);
            return Ok(End::EndOfFile);
        }

        if block.len() - written < MIN_ROOM {
            let index = next_block().ok_or(CompressBlockError::NoBlockLeft)?;
            block[written..written + 2].copy_from_slice(&[CMD_BYTE, index]);
            return Ok(End::JumpToBlock(index));
        }

        if let Some(step) = Compression::next(reader) {
            written += step.write(&mut block[written..]);
        }
    }
}

/// A single step of the compression algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Compression {
    RunLength { value: u8, count: u8 },
    DefaultInstrument { count: u8 },
    DefaultWave { count: u8 },
    RleLiteral,
    CmdLiteral,
    Literal { value: u8 },
}

impl Compression {
    /// Consume the longest encodable sequence at the reader's position
    fn next(reader: &mut Cursor<&[u8]>) -> Option<Self> {
        if let count @ 1.. = count_matches(reader, &DEFAULT_INSTRUMENT, 0) {
            return Some(Self::DefaultInstrument { count });
        }

        if let count @ 1.. = count_matches(reader, &DEFAULT_WAVE, 0) {
            return Some(Self::DefaultWave { count });
        }

        let value = *remaining(reader).first()?;
        advance(reader, 1);

        let step = match value {
            CMD_BYTE => Self::CmdLiteral,
            RLE_BYTE => Self::RleLiteral,
            value => match count_matches(reader, &[value], 1) {
                count @ 2.. => Self::RunLength { value, count },
                _ => Self::Literal { value },
            },
        };

        Some(step)
    }

    /// Write the step into `dest`, returning the number of bytes written
    fn write(self, dest: &mut [u8]) -> usize {
        match self {
            Self::RunLength { value, count } => put(dest, &[RLE_BYTE, value, count]),
            Self::DefaultInstrument { count } => {
                put(dest, &[CMD_BYTE, DEFAULT_INSTRUMENT_BYTE, count])
            }
            Self::DefaultWave { count } => put(dest, &[CMD_BYTE, DEFAULT_WAVE_BYTE, count]),
            Self::RleLiteral => put(dest, &[RLE_BYTE, RLE_BYTE]),
            Self::CmdLiteral => put(dest, &[CMD_BYTE, CMD_BYTE]),
            Self::Literal { value } => put(dest, &[value]),
        }
    }
}

fn put(dest: &mut [u8], bytes: &[u8]) -> usize {
    dest[..bytes.len()].copy_from_slice(bytes);
    bytes.len()
}

/// The unread part of the reader
fn remaining<'a>(reader: &Cursor<&'a [u8]>) -> &'a [u8] {
    let data: &'a [u8] = *reader.get_ref();
    let position = usize::try_from(reader.position()).unwrap_or(usize::MAX);
    data.get(position..).unwrap_or_default()
}

fn advance(reader: &mut Cursor<&[u8]>, count: usize) {
    reader.set_position(reader.position() + count as u64);
}

/// Consume consecutive repetitions of `pattern`, counting up from `init`.
///
/// Counting stops at 255, the largest count a command can hold.
fn count_matches(reader: &mut Cursor<&[u8]>, pattern: &[u8], init: u8) -> u8 {
    let mut count = init;
    while count < u8::MAX && remaining(reader).starts_with(pattern) {
        count += 1;
        advance(reader, pattern.len());
    }
    count
}
