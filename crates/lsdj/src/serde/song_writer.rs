use std::io::{self, Write};

use crate::error::ReadSongError;
use crate::song::SongMemory;

/// A [`Write`] target for decompressing a single song.
///
/// Bytes past the end of song memory are counted and dropped, so oversized
/// data is reported with its real length instead of failing the write.
#[derive(Debug)]
pub(crate) struct SongWriter {
    memory: Vec<u8>,
    len: u64,
}

impl SongWriter {
    pub(crate) fn new() -> Self {
        Self {
            memory: Vec::with_capacity(SongMemory::LEN),
            len: 0,
        }
    }

    /// The song, if exactly [`SongMemory::LEN`] bytes were written
    pub(crate) fn finish(self) -> Result<SongMemory, ReadSongError> {
        if self.len != SongMemory::LEN as u64 {
            return Err(ReadSongError::SizeMismatch { len: self.len });
        }

        Ok(SongMemory::try_from(self.memory.as_slice())?)
    }
}

impl Write for SongWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let room = SongMemory::LEN - self.memory.len();
        self.memory.extend_from_slice(&buf[..buf.len().min(room)]);
        self.len += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
