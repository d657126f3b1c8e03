//! Sample kits stored in the LSDJ ROM

use std::fmt;
use std::io::Read;
use std::path::Path;

use crate::error::KitError;

const HEADER: [u8; 2] = [0x60, 0x40];
const NAME_OFFSET: usize = 0x52;
const NAME_LEN: usize = 6;
const VERSION_OFFSET: usize = 0x5F;
const SAMPLE_NAME_OFFSET: usize = 0x22;
const SAMPLE_NAME_LEN: usize = 3;
const MAX_SAMPLE_SPACE: usize = 0x3FA0;

/// A bank of drum samples, as found in `.kit` files.
///
/// ```text
/// 0x00..0x20   sample offset table, little-endian, bank-addressed
/// 0x22..0x4F   15 sample names of 3 bytes
/// 0x52..0x58   kit name
/// 0x5F         kit version
/// ```
///
/// Sample `i` spans from the offset at `2i` to the offset at `2i + 2`. Slots
/// marked `0x0000` or `0xFFFF` are empty and skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kit {
    name: String,
    version: u8,
    samples: Vec<Sample>,
}

impl Kit {
    /// The length in bytes of a kit, a single ROM bank
    pub const LEN: usize = 0x4000;

    /// The maximum number of samples in a kit
    pub const SAMPLES_CAPACITY: usize = 15;

    /// Read a kit from an I/O reader.
    pub fn from_reader<R>(mut reader: R) -> Result<Self, KitError>
    where
        R: Read,
    {
        let mut bytes = Vec::with_capacity(Self::LEN);
        reader.read_to_end(&mut bytes)?;
        Self::try_from(bytes.as_slice())
    }

    /// Read a kit from a file on disk.
    pub fn from_path<P>(path: P) -> Result<Self, KitError>
    where
        P: AsRef<Path>,
    {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// The name of the kit, padded with spaces
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The version of the kit
    pub fn version(&self) -> u8 {
        self.version
    }

    /// The samples in the non-empty slots
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }
}

impl TryFrom<&[u8]> for Kit {
    type Error = KitError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        if bytes.len() != Self::LEN {
            return Err(KitError::IncorrectSize { len: bytes.len() });
        }

        if bytes[..2] != HEADER {
            return Err(KitError::InvalidHeader(bytes[0], bytes[1]));
        }

        let name = std::str::from_utf8(&bytes[NAME_OFFSET..NAME_OFFSET + NAME_LEN])
            .map_err(|_| KitError::InvalidName)?
            .to_owned();

        let mut samples = Vec::new();
        for index in 0..Self::SAMPLES_CAPACITY {
            if let Some(sample) = read_sample(bytes, index)? {
                samples.push(sample);
            }
        }

        Ok(Self {
            name,
            version: bytes[VERSION_OFFSET],
            samples,
        })
    }
}

impl fmt::Display for Kit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Kit {} v{:03}", self.name, self.version)?;
        for sample in &self.samples {
            writeln!(f, "  {sample}")?;
        }
        Ok(())
    }
}

/// A single drum sample in a [`Kit`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    name: String,
    data: Vec<u8>,
}

impl Sample {
    /// The three-character name of the sample
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw 4-bit sample data
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} bytes)", self.name, self.data.len())
    }
}

fn read_sample(bytes: &[u8], index: usize) -> Result<Option<Sample>, KitError> {
    let Some(start) = read_offset(bytes, index * 2) else {
        return Ok(None);
    };
    let Some(end) = read_offset(bytes, index * 2 + 2) else {
        return Ok(None);
    };

    if start > end || end > MAX_SAMPLE_SPACE {
        return Err(KitError::InvalidSampleRange { index, start, end });
    }

    let name_offset = SAMPLE_NAME_OFFSET + index * SAMPLE_NAME_LEN;
    let name = std::str::from_utf8(&bytes[name_offset..name_offset + SAMPLE_NAME_LEN])
        .map_err(|_| KitError::InvalidSampleName { index })?
        .to_owned();

    Ok(Some(Sample {
        name,
        data: bytes[start..end].to_vec(),
    }))
}

/// A bank-relative offset from the sample table, [`None`] for empty slots
fn read_offset(bytes: &[u8], at: usize) -> Option<usize> {
    match u16::from_le_bytes([bytes[at], bytes[at + 1]]) {
        0x0000 | 0xFFFF => None,
        address => usize::from(address).checked_sub(Kit::LEN),
    }
}
