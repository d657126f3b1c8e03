use std::fmt;

use super::Filesystem;
use crate::error::IndexError;

/// A file slot in the [`Filesystem`], in the range `0..32`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Index(u8);

impl Index {
    /// The first file slot
    pub const FIRST: Self = Self(0);

    /// The last file slot
    pub const LAST: Self = Self(Filesystem::FILES_CAPACITY as u8 - 1);

    /// Create an index, failing if it is out of range.
    pub fn new(value: u8) -> Result<Self, IndexError> {
        Self::try_from(usize::from(value))
    }

    /// The slot number
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Every file slot, in order
    pub fn all() -> impl Iterator<Item = Self> {
        (Self::FIRST.0..=Self::LAST.0).map(Self)
    }
}

impl TryFrom<usize> for Index {
    type Error = IndexError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        match u8::try_from(value) {
            Ok(slot) if value < Filesystem::FILES_CAPACITY => Ok(Self(slot)),
            _ => Err(IndexError(value)),
        }
    }
}

impl TryFrom<u8> for Index {
    type Error = IndexError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Index> for u8 {
    fn from(index: Index) -> Self {
        index.0
    }
}

impl From<Index> for usize {
    fn from(index: Index) -> Self {
        usize::from(index.0)
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
