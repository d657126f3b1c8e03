use std::io::{self, Read, Write};

use super::{End, CMD_BYTE, DEFAULT_INSTRUMENT_BYTE, DEFAULT_WAVE_BYTE, EOF_BYTE, RLE_BYTE};
use crate::song::{DEFAULT_INSTRUMENT, DEFAULT_WAVE};

/// Decompress a single block from `reader` into `writer`.
///
/// Bytes are decoded until either an end-of-file command is read, returning
/// [`End::EndOfFile`], or a block-jump command is read, returning
/// [`End::JumpToBlock`]. Following the jump is left to the caller.
pub fn decompress_block<R, W>(mut reader: R, mut writer: W) -> io::Result<End>
where
    R: Read,
    W: Write,
{
    loop {
        match read_byte(&mut reader)? {
            RLE_BYTE => decompress_rle(&mut reader, &mut writer)?,
            CMD_BYTE => {
                if let Some(end) = decompress_cmd(&mut reader, &mut writer)? {
                    return Ok(end);
                }
            }
            value => writer.write_all(&[value])?,
        }
    }
}

fn decompress_rle<R, W>(mut reader: R, mut writer: W) -> io::Result<()>
where
    R: Read,
    W: Write,
{
    match read_byte(&mut reader)? {
        RLE_BYTE => writer.write_all(&[RLE_BYTE]),
        value => {
            let count = read_byte(&mut reader)?;
            write_repeated(&[value], count, writer)
        }
    }
}

/// Decode a command, returning how the block ended if it did
fn decompress_cmd<R, W>(mut reader: R, mut writer: W) -> io::Result<Option<End>>
where
    R: Read,
    W: Write,
{
    match read_byte(&mut reader)? {
        CMD_BYTE => writer.write_all(&[CMD_BYTE])?,
        DEFAULT_WAVE_BYTE => {
            let count = read_byte(&mut reader)?;
            write_repeated(&DEFAULT_WAVE, count, writer)?;
        }
        DEFAULT_INSTRUMENT_BYTE => {
            let count = read_byte(&mut reader)?;
            write_repeated(&DEFAULT_INSTRUMENT, count, writer)?;
        }
        EOF_BYTE => return Ok(Some(End::EndOfFile)),
        block => return Ok(Some(End::JumpToBlock(block))),
    }

    Ok(None)
}

fn read_byte<R>(mut reader: R) -> io::Result<u8>
where
    R: Read,
{
    let mut byte = [0];
    reader.read_exact(&mut byte)?;
    Ok(byte[0])
}

fn write_repeated<W>(bytes: &[u8], count: u8, mut writer: W) -> io::Result<()>
where
    W: Write,
{
    for _ in 0..count {
        writer.write_all(bytes)?;
    }
    Ok(())
}
